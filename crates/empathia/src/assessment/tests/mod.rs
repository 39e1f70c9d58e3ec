mod common;
mod matcher;
mod service;
