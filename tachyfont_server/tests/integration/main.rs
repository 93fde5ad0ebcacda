mod base;
mod helpers;
mod ping;
