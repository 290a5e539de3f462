//! CLI commands.
//!
//! Commands are organized by concern:
//! - `documents`: list, view and delete
//! - `upload`: the upload dialog flow

pub mod documents;
pub mod upload;

pub use documents::{delete_document, list_documents, view_document};
pub use upload::upload_document;

use serde::Serialize;

use docdesk::logging::LogFormat;

/// Result wrapper shared by all commands.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Something a command can print for a human.
pub trait Render {
    fn render(&self) -> String;
}

impl<T: Serialize + Render> ApiResponse<T> {
    /// Prints the response and returns the process exit code.
    pub fn emit(&self, format: LogFormat) -> i32 {
        match format {
            LogFormat::Json => match serde_json::to_string_pretty(self) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to serialize response: {}", e),
            },
            LogFormat::Human => {
                if let Some(data) = &self.data {
                    println!("{}", data.render());
                }
                if let Some(error) = &self.error {
                    eprintln!("Error: {}", error);
                }
            }
        }

        if self.success {
            0
        } else {
            1
        }
    }
}
