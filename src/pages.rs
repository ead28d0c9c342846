mod login;

pub use login::{LOGIN_ENDPOINT, LoginPage};
