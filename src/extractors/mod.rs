pub mod principal;

pub use principal::{principal_from_headers, ROLE_COOKIE, ROLE_HEADER};
