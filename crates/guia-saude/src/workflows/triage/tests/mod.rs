mod common;

mod matcher;
mod session;
