mod adopt;
mod query;
