//! Evaluation of classified corpora: system output files and confusion matrices.

pub mod confusion_matrix;
pub mod sys_output;

pub use confusion_matrix::ConfusionMatrix;
pub use sys_output::{format_sys_output, write_sys_output, write_sys_output_file};
