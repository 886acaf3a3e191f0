mod join_filter;
mod path;
mod scope;
