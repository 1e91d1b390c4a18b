mod mod_schema;
