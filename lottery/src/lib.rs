extern crate failure;
#[macro_use]
extern crate failure_derive;
extern crate rand;

pub mod game;
