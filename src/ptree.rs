//! Main module for ptree library functionality

pub mod ast;
pub mod building;
pub mod config;
pub mod fixing;
pub mod formatting;
pub mod lexing;
pub mod naming;
pub mod validation;
