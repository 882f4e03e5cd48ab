//! MedChat: a terminal client for a medical question-answering chat service.

pub mod api;
pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;
