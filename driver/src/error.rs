use error_stack::Report;

use kernel::{ErrorMessage, KernelError};

/// Maps a driver-specific error into a `KernelError` report.
pub trait ConvertError: 'static + Sync + Send {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T: 'static + Sync + Send> ConvertError for Result<T, dotenvy::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::new(error).change_context(KernelError::Configuration))
    }
}

/// Attaches a caller-facing message when the store rejected a duplicate.
pub(crate) fn on_conflict<T>(
    result: error_stack::Result<T, KernelError>,
    message: impl FnOnce() -> String,
) -> error_stack::Result<T, KernelError> {
    result.map_err(|report| match report.current_context() {
        KernelError::Conflict => report.attach_printable(ErrorMessage::new(message())),
        _ => report,
    })
}
