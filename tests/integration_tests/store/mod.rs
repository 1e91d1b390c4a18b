mod mod_import;
mod mod_near;
