mod common;
mod rejection;
