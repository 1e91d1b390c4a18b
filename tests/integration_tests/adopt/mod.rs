mod mod_by_id;
mod mod_listing;
