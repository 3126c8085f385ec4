//! Process exit codes.
//!
//! These values are stable so scripts can tell failures apart.

use std::process::ExitCode;

use confetti_client::ClientError;

pub const HOME_DIR_DOES_NOT_EXIST: u8 = 169;
pub const CONFIG_INVALID: u8 = 170;
pub const CONNECTION_ERROR: u8 = 171;
pub const DISCONNECTED: u8 = 172;
pub const CONFIG_FILE_CREATED: u8 = 173;
pub const CONFIG_FILE_NOT_FOUND: u8 = 174;
pub const GENERAL_FAILURE: u8 = 1;

/// Map a client error to its exit status.
pub fn client_code(err: &ClientError) -> u8 {
    match err {
        ClientError::HomeDirMissing(_) => HOME_DIR_DOES_NOT_EXIST,
        ClientError::ConfigInvalid(_) => CONFIG_INVALID,
        ClientError::Connection(_) => CONNECTION_ERROR,
        ClientError::Disconnected { .. } => DISCONNECTED,
        ClientError::ConfigCreated(_) => CONFIG_FILE_CREATED,
        ClientError::ConfigNotFound(_) => CONFIG_FILE_NOT_FOUND,
        ClientError::Io(_) => GENERAL_FAILURE,
    }
}

pub fn code_for(err: &anyhow::Error) -> ExitCode {
    let code = err
        .downcast_ref::<ClientError>()
        .map(client_code)
        .unwrap_or(GENERAL_FAILURE);
    ExitCode::from(code)
}
