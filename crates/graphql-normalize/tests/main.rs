mod extensions;
mod normalization;
mod variables;
mod variables_mapper;
mod walker;
