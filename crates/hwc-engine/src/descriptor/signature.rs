//! Parameter signatures for constructors and actions, and argument binding.

use std::fmt;

use hwc_core::constants::KEY_BITS_PER_ACTION;
use hwc_core::errors::ModelError;
use hwc_core::types::SmallVec4;

use crate::value::{ParamValue, Params};

/// Required/optional parameter partition of one callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    owner: String,
    name: String,
    required: SmallVec4<String>,
    optional: Vec<(String, ParamValue)>,
}

impl Signature {
    /// An empty signature. `name` is empty for constructors.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            owner: String::new(),
            name: name.into(),
            required: SmallVec4::new(),
            optional: Vec::new(),
        }
    }

    pub fn required(mut self, param: impl Into<String>) -> Self {
        self.required.push(param.into());
        self
    }

    pub fn optional(mut self, param: impl Into<String>, default: impl Into<ParamValue>) -> Self {
        self.optional.push((param.into(), default.into()));
        self
    }

    pub(crate) fn set_owner(&mut self, owner: &str) {
        self.owner = owner.to_string();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Model.function`, or just `Model` for constructors.
    pub fn qualified_name(&self) -> String {
        if self.name.is_empty() {
            self.owner.clone()
        } else {
            format!("{}.{}", self.owner, self.name)
        }
    }

    pub fn required_params(&self) -> &[String] {
        &self.required
    }

    pub fn optional_params(&self) -> &[(String, ParamValue)] {
        &self.optional
    }

    /// All declared parameter names, required first.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.required
            .iter()
            .map(String::as_str)
            .chain(self.optional.iter().map(|(n, _)| n.as_str()))
    }

    pub fn accepts(&self, param: &str) -> bool {
        self.param_names().any(|p| p == param)
    }

    /// Describe the first required parameter absent from `params`, or `None`
    /// when every required parameter is present.
    pub fn missing_error(&self, params: &Params) -> Option<String> {
        self.required
            .iter()
            .find(|p| !params.contains(p))
            .map(|p| {
                format!(
                    "Argument for {} is missing: {}. Arguments provided: {}",
                    self.qualified_name(),
                    p,
                    params.key_list()
                )
            })
    }

    /// Supplied keys this signature does not declare.
    pub fn unused<'a>(&self, params: &'a Params) -> Vec<&'a str> {
        params.keys().filter(|k| !self.accepts(k)).collect()
    }

    /// Bind `params` to this signature: keep declared keys, fill defaults for
    /// absent optional parameters, and record unknown keys as unused.
    pub fn bind(&self, params: &Params) -> Result<Args, ModelError> {
        if let Some(message) = self.missing_error(params) {
            return Err(ModelError::ArgumentMismatch(message));
        }
        let mut values = Params::new();
        for name in &self.required {
            if let Some(v) = params.get(name) {
                values.insert(name.clone(), v.clone());
            }
        }
        for (name, default) in &self.optional {
            let v = params.get(name).unwrap_or(default);
            values.insert(name.clone(), v.clone());
        }
        Ok(Args {
            context: self.qualified_name(),
            values,
            unused: self.unused(params).into_iter().map(str::to_string).collect(),
        })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.required.iter().cloned().collect();
        parts.extend(self.optional.iter().map(|(n, d)| format!("{n}={d}")));
        write!(f, "{}({})", self.qualified_name(), parts.join(", "))
    }
}

/// A declared action: its signature plus aggregation flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSpec {
    signature: Signature,
    pipelined: bool,
    bits_per_action: Option<String>,
}

impl ActionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            signature: Signature::new(name),
            pipelined: false,
            bits_per_action: None,
        }
    }

    pub fn required(mut self, param: impl Into<String>) -> Self {
        self.signature = self.signature.required(param);
        self
    }

    pub fn optional(mut self, param: impl Into<String>, default: impl Into<ParamValue>) -> Self {
        self.signature = self.signature.optional(param, default);
        self
    }

    /// Subcomponent latencies overlap (max) instead of adding up (sum).
    pub fn pipelined(mut self) -> Self {
        self.pipelined = true;
        self
    }

    /// Enable bit-width scaling against the model attribute `attribute`.
    /// Callers may then pass `bits_per_action`.
    pub fn bits_per_action(mut self, attribute: impl Into<String>) -> Self {
        self.bits_per_action = Some(attribute.into());
        self
    }

    pub fn name(&self) -> &str {
        self.signature.name()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn signature_mut(&mut self) -> &mut Signature {
        &mut self.signature
    }

    pub fn is_pipelined(&self) -> bool {
        self.pipelined
    }

    pub fn nominal_bits_attribute(&self) -> Option<&str> {
        self.bits_per_action.as_deref()
    }

    /// Bind call arguments. `bits_per_action` is consumed here when the action
    /// declares bit-width scaling and is never forwarded to the body.
    pub fn bind(&self, params: &Params) -> Result<(Args, Option<ParamValue>), ModelError> {
        if self.bits_per_action.is_some() && params.contains(KEY_BITS_PER_ACTION) {
            let mut stripped = params.clone();
            let bits = stripped.remove(KEY_BITS_PER_ACTION);
            return Ok((self.signature.bind(&stripped)?, bits));
        }
        Ok((self.signature.bind(params)?, None))
    }
}

impl fmt::Display for ActionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.signature.required_params().to_vec();
        parts.extend(
            self.signature
                .optional_params()
                .iter()
                .map(|(n, _)| format!("OPTIONAL {n}")),
        );
        if self.bits_per_action.is_some() {
            parts.push(format!("OPTIONAL {KEY_BITS_PER_ACTION}"));
        }
        write!(f, "{}({})", self.name(), parts.join(", "))
    }
}

/// Arguments bound to a signature, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    context: String,
    values: Params,
    unused: Vec<String>,
}

impl Args {
    /// Bind-free construction for calls that don't go through a signature.
    pub fn from_params(context: impl Into<String>, values: Params) -> Self {
        Self {
            context: context.into(),
            values,
            unused: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    fn require(&self, name: &str) -> Result<&ParamValue, ModelError> {
        self.values.get(name).ok_or_else(|| ModelError::MissingArgument {
            context: self.context.clone(),
            name: name.to_string(),
        })
    }

    fn param_context(&self, name: &str) -> String {
        format!("{}.{}", self.context, name)
    }

    pub fn f64(&self, name: &str) -> Result<f64, ModelError> {
        self.require(name)?.as_f64(&self.param_context(name))
    }

    pub fn i64(&self, name: &str) -> Result<i64, ModelError> {
        self.require(name)?.as_i64(&self.param_context(name))
    }

    pub fn bool(&self, name: &str) -> Result<bool, ModelError> {
        self.require(name)?.as_bool(&self.param_context(name))
    }

    pub fn str(&self, name: &str) -> Result<&str, ModelError> {
        let value = self.require(name)?;
        value.as_str().ok_or_else(|| ModelError::InvalidArgument {
            context: self.param_context(name),
            message: format!("expected a string, got {value}"),
        })
    }

    /// The bound values, defaults included.
    pub fn params(&self) -> &Params {
        &self.values
    }

    /// Supplied keys the signature did not declare.
    pub fn unused(&self) -> &[String] {
        &self.unused
    }

    pub fn context(&self) -> &str {
        &self.context
    }
}
