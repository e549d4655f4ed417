//! Component factory registry
//!
//! Maps component type names to constructors so components can be created
//! from a name chosen in the editor or read from a scene file.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

use crate::reflect::{Reflect, TypeInfo};

/// Constructor producing a default instance of a component type
pub type ComponentFactoryFn = Arc<dyn Fn() -> Box<dyn Reflect> + Send + Sync>;

/// Category bucket for types registered without one
pub const UNCATEGORIZED: &str = "None";

struct Registration {
    category: Option<String>,
    factory: ComponentFactoryFn,
}

/// Registry of component constructors keyed by type name
#[derive(Default)]
pub struct ComponentRegistry {
    registrations: HashMap<String, Registration>,
}

impl ComponentRegistry {
    /// Create a new empty component registry
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
        }
    }

    /// Register a derived component type under its reflected name and category
    pub fn register<T: TypeInfo + Reflect + Default>(&mut self) {
        self.register_factory(T::TYPE_NAME, T::CATEGORY, || Box::new(T::default()));
    }

    /// Register a constructor under an explicit name
    pub fn register_factory<F>(&mut self, type_name: &str, category: Option<&str>, factory: F)
    where
        F: Fn() -> Box<dyn Reflect> + Send + Sync + 'static,
    {
        self.registrations.insert(
            type_name.to_string(),
            Registration {
                category: category.map(str::to_string),
                factory: Arc::new(factory),
            },
        );
        debug!(type_name = type_name, category = ?category, "Registered component factory");
    }

    /// Construct a default instance of a registered type
    pub fn create(&self, type_name: &str) -> Option<Box<dyn Reflect>> {
        self.registrations.get(type_name).map(|r| (r.factory)())
    }

    /// Check if a component type is registered
    pub fn is_registered(&self, type_name: &str) -> bool {
        self.registrations.contains_key(type_name)
    }

    pub fn category_of(&self, type_name: &str) -> Option<&str> {
        self.registrations.get(type_name)?.category.as_deref()
    }

    /// All registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.registrations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Category name to sorted type names; uncategorized types go under "None"
    pub fn categories(&self) -> BTreeMap<String, Vec<String>> {
        let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, registration) in &self.registrations {
            let category = registration
                .category
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            out.entry(category).or_default().push(name.clone());
        }
        for names in out.values_mut() {
            names.sort();
        }
        out
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Create a registry with all built-in components registered
    pub fn with_default_components() -> Self {
        use crate::core::camera::Camera;
        use crate::scene::components::{
            CollisionShape, DebugRenderer, Light, Octree, RigidBody, SoundSource, StaticModel, Zone,
        };

        let mut registry = Self::new();

        registry.register::<Camera>();
        registry.register::<Zone>();
        registry.register::<Light>();
        registry.register::<StaticModel>();
        registry.register::<DebugRenderer>();
        registry.register::<Octree>();
        registry.register::<RigidBody>();
        registry.register::<CollisionShape>();
        registry.register::<SoundSource>();

        debug!(
            component_count = registry.len(),
            "Created registry with default components"
        );

        registry
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("registered_types", &self.type_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reflect;

    #[derive(Debug, Clone, Default, PartialEq, Reflect)]
    struct Marker {
        value: i32,
    }

    #[test]
    fn test_component_registry_basic() {
        let mut registry = ComponentRegistry::new();
        assert!(registry.is_empty());

        registry.register::<Marker>();
        assert_eq!(registry.len(), 1);
        assert!(registry.is_registered("Marker"));
        assert!(!registry.is_registered("UnknownComponent"));
    }

    #[test]
    fn test_create_by_name() {
        let registry = ComponentRegistry::with_default_components();
        let light = registry.create("Light").unwrap();
        assert_eq!(light.type_name(), "Light");
        assert!(registry.create("Unknown").is_none());
    }

    #[test]
    fn test_categories_bucket_uncategorized() {
        let mut registry = ComponentRegistry::with_default_components();
        registry.register::<Marker>();

        let categories = registry.categories();
        assert_eq!(categories[UNCATEGORIZED], vec!["Marker".to_string()]);
        assert_eq!(
            categories["Scene"],
            vec!["Camera".to_string(), "Light".to_string(), "Zone".to_string()]
        );
        assert!(categories["Geometry"].contains(&"StaticModel".to_string()));
    }

    #[test]
    fn test_registry_default() {
        let registry = ComponentRegistry::with_default_components();
        for name in [
            "Camera",
            "StaticModel",
            "Zone",
            "Light",
            "DebugRenderer",
            "Octree",
            "RigidBody",
            "CollisionShape",
            "SoundSource",
        ] {
            assert!(registry.is_registered(name), "{name} missing");
        }
        assert_eq!(registry.category_of("Octree"), Some("Subsystem"));
    }
}
