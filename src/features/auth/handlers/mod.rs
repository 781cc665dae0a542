pub mod auth_handler;

pub use auth_handler::{
    __path_change_password, __path_login, __path_verify_token, change_password, login,
    verify_token,
};
