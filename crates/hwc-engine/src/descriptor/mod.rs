//! Capability descriptors: the static description of one cost-model type.
//!
//! A descriptor is declared once per type through [`DescriptorBuilder`],
//! validated, and cached process-wide by [`descriptor_of`].

pub mod signature;

use std::any::TypeId;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use hwc_core::constants::{KEY_TIME_PERIOD, LEAK_ACTION};
use hwc_core::errors::RegistryError;
use hwc_core::types::{FxHashMap, FxHashSet, SmallVec2, SmallVec4};

use crate::model::ModelType;
use crate::value::ParamValue;

pub use signature::{ActionSpec, Args, Signature};

/// Immutable description of a cost-model type.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityDescriptor {
    name: String,
    component_names: SmallVec2<String>,
    priority: f64,
    constructor: Signature,
    actions: SmallVec4<ActionSpec>,
}

impl CapabilityDescriptor {
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercased component aliases.
    pub fn component_names(&self) -> &[String] {
        &self.component_names
    }

    pub fn priority(&self) -> f64 {
        self.priority
    }

    pub fn constructor(&self) -> &Signature {
        &self.constructor
    }

    /// Declared actions, the built-in `leak` action last.
    pub fn actions(&self) -> &[ActionSpec] {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&ActionSpec> {
        self.actions.iter().find(|a| a.name() == name)
    }

    pub fn supports_action(&self, name: &str) -> bool {
        self.action(name).is_some()
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.actions.iter().map(ActionSpec::name).collect()
    }

    /// Exact, case-insensitive alias match.
    pub fn matches_component(&self, component: &str) -> bool {
        let component = component.to_lowercase();
        self.component_names.iter().any(|n| *n == component)
    }

    /// Aliases equal to `component` once case and underscores are ignored.
    pub fn relaxed_matches(&self, component: &str) -> Vec<&str> {
        let wanted = relax(component);
        self.component_names
            .iter()
            .filter(|n| relax(n) == wanted)
            .map(String::as_str)
            .collect()
    }

    /// `true` for a case-insensitive match against the type name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

fn relax(name: &str) -> String {
    name.to_lowercase().replace('_', "")
}

impl fmt::Display for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "\tComponent names: {}", self.component_names.join(", "))?;
        writeln!(f, "\tPriority: {}", self.priority)?;
        writeln!(f, "\tConstructor: {}", self.constructor)?;
        write!(f, "\tActions:")?;
        for action in &self.actions {
            write!(f, "\n\t\t{action}")?;
        }
        Ok(())
    }
}

/// Builder for [`CapabilityDescriptor`]. Validation runs in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    name: String,
    component_names: Option<Vec<String>>,
    priority: Option<f64>,
    constructor: Signature,
    actions: Vec<ActionSpec>,
}

impl DescriptorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            component_names: None,
            priority: None,
            constructor: Signature::new(""),
            actions: Vec::new(),
        }
    }

    /// Component aliases. Defaults to the model name when never called.
    pub fn component_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.component_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn component_name(self, name: impl Into<String>) -> Self {
        self.component_names([name.into()])
    }

    pub fn priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Required constructor parameter.
    pub fn required(mut self, param: impl Into<String>) -> Self {
        self.constructor = self.constructor.required(param);
        self
    }

    /// Optional constructor parameter with its default.
    pub fn optional(mut self, param: impl Into<String>, default: impl Into<ParamValue>) -> Self {
        self.constructor = self.constructor.optional(param, default);
        self
    }

    pub fn action(mut self, action: ActionSpec) -> Self {
        self.actions.push(action);
        self
    }

    pub fn build(self) -> Result<CapabilityDescriptor, RegistryError> {
        let model = self.name;

        let raw_names = self
            .component_names
            .unwrap_or_else(|| vec![model.clone()]);
        if raw_names.is_empty() {
            return Err(RegistryError::NoComponentNames { model });
        }
        let mut component_names = SmallVec2::new();
        for name in raw_names {
            if name.trim().is_empty() {
                return Err(RegistryError::InvalidComponentName {
                    model,
                    name,
                    reason: "component names must be non-empty".into(),
                });
            }
            if name.chars().any(char::is_whitespace) {
                return Err(RegistryError::InvalidComponentName {
                    model,
                    name,
                    reason: "component names may not contain whitespace".into(),
                });
            }
            let lowered = name.to_lowercase();
            if !component_names.contains(&lowered) {
                component_names.push(lowered);
            }
        }

        let priority = match self.priority {
            None => return Err(RegistryError::MissingPriority { model }),
            Some(p) if !p.is_finite() || !(0.0..=1.0).contains(&p) => {
                return Err(RegistryError::InvalidPriority { model, priority: p })
            }
            Some(p) => p,
        };

        let mut constructor = self.constructor;
        constructor.set_owner(&model);
        check_unique_params(&model, &constructor)?;

        let mut seen = FxHashSet::default();
        let mut actions = SmallVec4::new();
        for mut action in self.actions {
            if action.name() == LEAK_ACTION {
                return Err(RegistryError::ReservedAction {
                    model,
                    action: LEAK_ACTION.into(),
                });
            }
            if !seen.insert(action.name().to_string()) {
                return Err(RegistryError::DuplicateAction {
                    model,
                    action: action.name().to_string(),
                });
            }
            action.signature_mut().set_owner(&model);
            check_unique_params(&model, action.signature())?;
            actions.push(action);
        }

        let mut leak = ActionSpec::new(LEAK_ACTION).required(KEY_TIME_PERIOD);
        leak.signature_mut().set_owner(&model);
        actions.push(leak);

        Ok(CapabilityDescriptor {
            name: model,
            component_names,
            priority,
            constructor,
            actions,
        })
    }
}

fn check_unique_params(model: &str, signature: &Signature) -> Result<(), RegistryError> {
    let mut seen = FxHashSet::default();
    for param in signature.param_names() {
        if !seen.insert(param) {
            return Err(RegistryError::DuplicateParameter {
                model: model.to_string(),
                function: signature.qualified_name(),
                param: param.to_string(),
            });
        }
    }
    Ok(())
}

type DescriptorCache = Mutex<FxHashMap<TypeId, Arc<CapabilityDescriptor>>>;

static DESCRIPTORS: OnceLock<DescriptorCache> = OnceLock::new();

/// The validated descriptor of `M`, built on first use and shared afterwards.
pub fn descriptor_of<M: ModelType>() -> Result<Arc<CapabilityDescriptor>, RegistryError> {
    let cache = DESCRIPTORS.get_or_init(|| Mutex::new(FxHashMap::default()));
    let key = TypeId::of::<M>();
    if let Some(found) = cache
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .get(&key)
    {
        return Ok(Arc::clone(found));
    }

    // Built outside the lock; a racing builder produces an identical value.
    let built = Arc::new(M::describe().build()?);
    let mut guard = cache.lock().unwrap_or_else(|e| e.into_inner());
    Ok(Arc::clone(guard.entry(key).or_insert(built)))
}
