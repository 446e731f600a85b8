use super::ComponentDef;

/// 標準カタログ (plates / tablets are treated as raw resources)
pub fn components() -> Vec<ComponentDef> {
    vec![
        ComponentDef::resource("iron-plate"),
        ComponentDef::resource("copper-plate"),
        ComponentDef::resource("stone-tablet"),
        ComponentDef::assembler("copper-cable", "copper-cable", &["copper-plate"]),
        ComponentDef::assembler("iron-gear-wheel", "iron-gear-wheel", &["iron-plate"]),
        ComponentDef::assembler("iron-stick", "iron-stick", &["iron-plate"]),
        ComponentDef::assembler(
            "single-cylinder-engine",
            "motor",
            &["iron-gear-wheel", "iron-plate"],
        ),
        ComponentDef::assembler(
            "burner-inserter",
            "burner-inserter",
            &["iron-stick", "single-cylinder-engine"],
        ),
        ComponentDef::assembler(
            "small-electric-motor",
            "electric-motor",
            &["iron-gear-wheel", "copper-cable", "iron-plate"],
        ),
        ComponentDef::assembler(
            "inserter",
            "inserter",
            &["burner-inserter", "small-electric-motor"],
        ),
        ComponentDef::assembler(
            "long-handed-inserter",
            "long-handed-inserter",
            &["inserter", "iron-stick", "iron-plate"],
        ),
        ComponentDef::assembler(
            "electronic-circuit",
            "electronic-circuit",
            &["copper-cable", "stone-tablet"],
        ),
        ComponentDef::assembler(
            "fast-inserter",
            "fast-inserter",
            &["electronic-circuit", "inserter", "iron-plate"],
        ),
    ]
}
