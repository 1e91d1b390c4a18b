// Aggregates per-module integration suites
mod adopt;
mod graphql;
mod slider;
mod store;
mod support;
