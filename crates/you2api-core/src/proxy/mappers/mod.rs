// Mappers module - protocol translation

pub mod youchat;
