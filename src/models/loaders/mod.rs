pub mod file_loader;

pub use file_loader::{content_type_for, load_input_file, load_input_files};
