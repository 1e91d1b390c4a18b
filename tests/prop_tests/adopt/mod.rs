mod prop_conditions;
