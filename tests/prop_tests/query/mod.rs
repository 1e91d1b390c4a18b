mod prop_near;
