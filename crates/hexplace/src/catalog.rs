pub mod builtin;

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    path::Path,
};

use log::debug;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::error::{PlaceError, Result};

/// Nominal component type identifier. Two components are "the same kind" iff their ids are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Resource: always available, no dependencies. Assembler: consumes dependencies via a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    Resource,
    Assembler { recipe: String },
}

impl ComponentKind {
    pub fn is_resource(&self) -> bool {
        matches!(self, ComponentKind::Resource)
    }

    pub fn recipe(&self) -> Option<&str> {
        match self {
            ComponentKind::Resource => None,
            ComponentKind::Assembler { recipe } => Some(recipe),
        }
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDef {
    pub id: ComponentId,
    pub kind: ComponentKind,
    /// One entry per required unit; duplicates are meaningful
    pub dependencies: Vec<ComponentId>,
}

impl ComponentDef {
    pub fn resource(id: &str) -> Self {
        Self {
            id: ComponentId::new(id),
            kind: ComponentKind::Resource,
            dependencies: Vec::new(),
        }
    }

    pub fn assembler(id: &str, recipe: &str, dependencies: &[&str]) -> Self {
        Self {
            id: ComponentId::new(id),
            kind: ComponentKind::Assembler {
                recipe: recipe.to_string(),
            },
            dependencies: dependencies.iter().map(|d| ComponentId::new(*d)).collect(),
        }
    }
}

/// Read-only component table. Only constructed through validation, so tree
/// expansion over it always terminates.
#[derive(Debug, Clone)]
pub struct Catalog {
    defs: BTreeMap<ComponentId, ComponentDef>,
}

// TOML 上の表現
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
enum KindTag {
    Resource,
    Assembler,
}

#[derive(Debug, Deserialize)]
struct ComponentEntry {
    name: String,
    kind: KindTag,
    #[serde(default)]
    recipe: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "component", default)]
    components: Vec<ComponentEntry>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

impl Catalog {
    /// Validate and build a catalog
    pub fn new(defs: Vec<ComponentDef>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for def in defs {
            if map.contains_key(&def.id) {
                return Err(PlaceError::Catalog(format!(
                    "component '{}' is declared more than once",
                    def.id
                )));
            }
            map.insert(def.id.clone(), def);
        }

        let catalog = Self { defs: map };
        catalog.validate()?;
        debug!("Catalog validated: {} component types", catalog.len());
        Ok(catalog)
    }

    /// The shipped factory catalog
    pub fn builtin() -> Self {
        let defs = builtin::components()
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();
        Self { defs }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        let mut defs = Vec::with_capacity(file.components.len());

        for entry in file.components {
            let kind = match (entry.kind, entry.recipe) {
                (KindTag::Resource, None) => ComponentKind::Resource,
                (KindTag::Resource, Some(_)) => {
                    return Err(PlaceError::Catalog(format!(
                        "resource '{}' must not declare a recipe",
                        entry.name
                    )));
                }
                (KindTag::Assembler, Some(recipe)) => ComponentKind::Assembler { recipe },
                (KindTag::Assembler, None) => {
                    return Err(PlaceError::Catalog(format!(
                        "{} '{}' is missing its recipe",
                        KindTag::Assembler,
                        entry.name
                    )));
                }
            };
            defs.push(ComponentDef {
                id: ComponentId::new(entry.name),
                kind,
                dependencies: entry.dependencies.into_iter().map(ComponentId::new).collect(),
            });
        }

        Self::new(defs)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlaceError::Config(format!(
                "Failed to read catalog file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn get(&self, id: &ComponentId) -> Option<&ComponentDef> {
        self.defs.get(id)
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.defs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Definitions in id order
    pub fn iter(&self) -> impl Iterator<Item = &ComponentDef> {
        self.defs.values()
    }

    /// Number of nodes a full tree expansion rooted at `id` produces
    pub fn instance_count(&self, id: &ComponentId) -> Result<usize> {
        let mut memo = HashMap::new();
        self.count_instances(id, &mut memo)
    }

    fn count_instances(
        &self,
        id: &ComponentId,
        memo: &mut HashMap<ComponentId, usize>,
    ) -> Result<usize> {
        if let Some(&n) = memo.get(id) {
            return Ok(n);
        }
        let def = self
            .get(id)
            .ok_or_else(|| PlaceError::UnknownComponent(id.clone()))?;
        let mut total = 1;
        for dep in &def.dependencies {
            total += self.count_instances(dep, memo)?;
        }
        memo.insert(id.clone(), total);
        Ok(total)
    }

    fn validate(&self) -> Result<()> {
        for def in self.defs.values() {
            match &def.kind {
                ComponentKind::Resource if !def.dependencies.is_empty() => {
                    return Err(PlaceError::Catalog(format!(
                        "resource '{}' cannot have dependencies",
                        def.id
                    )));
                }
                ComponentKind::Assembler { recipe } if recipe.trim().is_empty() => {
                    return Err(PlaceError::Catalog(format!(
                        "assembler '{}' has an empty recipe",
                        def.id
                    )));
                }
                _ => {}
            }

            for dep in &def.dependencies {
                if !self.defs.contains_key(dep) {
                    return Err(PlaceError::Catalog(format!(
                        "'{}' depends on undefined component '{}'",
                        def.id, dep
                    )));
                }
            }
        }

        let mut state = HashMap::new();
        let mut path = Vec::new();
        for id in self.defs.keys() {
            self.check_cycles(id, &mut state, &mut path)?;
        }
        Ok(())
    }

    // 深さ優先で後退辺を探す
    fn check_cycles<'a>(
        &'a self,
        id: &'a ComponentId,
        state: &mut HashMap<&'a ComponentId, Visit>,
        path: &mut Vec<&'a ComponentId>,
    ) -> Result<()> {
        match state.get(id) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::InProgress) => {
                let start = path.iter().position(|p| *p == id).unwrap_or(0);
                let mut cycle: Vec<&str> = path[start..].iter().map(|p| p.as_str()).collect();
                cycle.push(id.as_str());
                return Err(PlaceError::Catalog(format!(
                    "dependency cycle: {}",
                    cycle.join(" -> ")
                )));
            }
            None => {}
        }

        state.insert(id, Visit::InProgress);
        path.push(id);
        if let Some(def) = self.defs.get(id) {
            for dep in &def.dependencies {
                self.check_cycles(dep, state, path)?;
            }
        }
        path.pop();
        state.insert(id, Visit::Done);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::new(builtin::components()).unwrap();
        assert_eq!(catalog.len(), Catalog::builtin().len());
    }

    #[test]
    fn test_component_id_equality_is_nominal() {
        let a = ComponentId::new("iron-plate");
        let b = ComponentId::from("iron-plate");
        assert_eq!(a, b);
        assert_ne!(a, ComponentId::new("copper-plate"));
    }

    #[test]
    fn test_instance_count() {
        let catalog = Catalog::builtin();
        // gear(1) + plate(1)
        assert_eq!(catalog.instance_count(&"iron-gear-wheel".into()).unwrap(), 2);
        // engine(1) + gear(2) + plate(1)
        assert_eq!(
            catalog
                .instance_count(&"single-cylinder-engine".into())
                .unwrap(),
            4
        );
        assert_eq!(catalog.instance_count(&"fast-inserter".into()).unwrap(), 20);
    }

    #[test]
    fn test_instance_count_unknown() {
        let catalog = Catalog::builtin();
        let err = catalog.instance_count(&"warp-drive".into()).unwrap_err();
        assert!(matches!(err, PlaceError::UnknownComponent(_)));
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let result = Catalog::new(vec![
            ComponentDef::resource("ore"),
            ComponentDef::resource("ore"),
        ]);
        assert!(matches!(result, Err(PlaceError::Catalog(_))));
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let result = Catalog::new(vec![ComponentDef::assembler("gear", "gear", &["plate"])]);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("undefined component 'plate'"), "{msg}");
    }

    #[test]
    fn test_cycle_rejected() {
        let result = Catalog::new(vec![
            ComponentDef::assembler("a", "a", &["b"]),
            ComponentDef::assembler("b", "b", &["c"]),
            ComponentDef::assembler("c", "c", &["a"]),
        ]);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("a -> b -> c -> a"), "{msg}");
    }

    #[test]
    fn test_self_dependency_rejected() {
        let result = Catalog::new(vec![ComponentDef::assembler("loop", "loop", &["loop"])]);
        assert!(matches!(result, Err(PlaceError::Catalog(_))));
    }

    #[test]
    fn test_resource_with_dependencies_rejected() {
        let mut ore = ComponentDef::resource("ore");
        ore.dependencies.push(ComponentId::new("ore"));
        assert!(Catalog::new(vec![ore]).is_err());
    }

    #[test]
    fn test_from_toml_str() {
        let toml = r#"
            [[component]]
            name = "plate"
            kind = "resource"

            [[component]]
            name = "gear"
            kind = "assembler"
            recipe = "iron-gear-wheel"
            dependencies = ["plate", "plate"]
        "#;
        let catalog = Catalog::from_toml_str(toml).unwrap();
        let gear = catalog.get(&"gear".into()).unwrap();
        assert_eq!(gear.kind.recipe(), Some("iron-gear-wheel"));
        assert_eq!(gear.dependencies.len(), 2);
        assert!(catalog.get(&"plate".into()).unwrap().kind.is_resource());
    }

    #[test]
    fn test_from_toml_missing_recipe() {
        let toml = r#"
            [[component]]
            name = "gear"
            kind = "assembler"
        "#;
        let msg = Catalog::from_toml_str(toml).unwrap_err().to_string();
        assert!(msg.contains("assembler 'gear' is missing its recipe"), "{msg}");
    }

    #[test]
    fn test_from_toml_unknown_kind() {
        let toml = r#"
            [[component]]
            name = "gear"
            kind = "smelter"
        "#;
        assert!(matches!(
            Catalog::from_toml_str(toml),
            Err(PlaceError::Config(_))
        ));
    }
}
