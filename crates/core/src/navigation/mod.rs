//! Navigation boundary used for login redirects

pub mod ports;
