//! The Estimation value type and the energy/latency pair.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use serde::Serialize;

/// An estimated value plus its provenance: success flag, message trail, and
/// the name of the model that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimation<V = f64> {
    pub value: V,
    pub success: bool,
    pub messages: Vec<String>,
    model_name: Option<String>,
}

impl<V> Estimation<V> {
    /// A successful estimation with no messages.
    pub fn new(value: V) -> Self {
        Self {
            value,
            success: true,
            messages: Vec::new(),
            model_name: None,
        }
    }

    /// Mark failed and record why.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.success = false;
        self.messages.push(reason.into());
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn add_messages<I>(&mut self, messages: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.messages.extend(messages.into_iter().map(Into::into));
    }

    pub fn last_message(&self) -> &str {
        self.messages
            .last()
            .map(String::as_str)
            .unwrap_or("No messages found.")
    }

    /// Record the producing model. The first name set wins.
    pub fn set_model_name(&mut self, name: impl Into<String>) {
        if self.model_name.is_none() {
            self.model_name = Some(name.into());
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    /// Replace the value, keeping success, messages, and attribution.
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Estimation<U> {
        Estimation {
            value: f(self.value),
            success: self.success,
            messages: self.messages,
            model_name: self.model_name,
        }
    }
}

impl<V: Default> Default for Estimation<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V> From<V> for Estimation<V> {
    fn from(value: V) -> Self {
        Self::new(value)
    }
}

macro_rules! impl_arith {
    ($($trait:ident::$method:ident),*) => {
        $(
            impl $trait for Estimation<f64> {
                type Output = Estimation<f64>;

                fn $method(self, rhs: Estimation<f64>) -> Estimation<f64> {
                    let mut messages = self.messages;
                    messages.extend(rhs.messages);
                    Estimation {
                        value: $trait::$method(self.value, rhs.value),
                        success: self.success && rhs.success,
                        messages,
                        model_name: self.model_name.or(rhs.model_name),
                    }
                }
            }

            impl $trait<f64> for Estimation<f64> {
                type Output = Estimation<f64>;

                fn $method(mut self, rhs: f64) -> Estimation<f64> {
                    self.value = $trait::$method(self.value, rhs);
                    self
                }
            }
        )*
    };
}

impl_arith!(Add::add, Sub::sub, Mul::mul, Div::div);

impl Neg for Estimation<f64> {
    type Output = Estimation<f64>;

    fn neg(mut self) -> Estimation<f64> {
        self.value = -self.value;
        self
    }
}

/// Energy (J) and latency (s) reported by one action invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EnergyLatency {
    pub energy: f64,
    pub latency: f64,
}

impl EnergyLatency {
    pub const ZERO: Self = Self {
        energy: 0.0,
        latency: 0.0,
    };

    pub fn new(energy: f64, latency: f64) -> Self {
        Self { energy, latency }
    }

    /// Energy only, zero latency.
    pub fn energy(energy: f64) -> Self {
        Self::new(energy, 0.0)
    }
}

impl Add for EnergyLatency {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.energy + rhs.energy, self.latency + rhs.latency)
    }
}

impl AddAssign for EnergyLatency {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
