//! Fixture cost models shared by the integration tests.

#![allow(dead_code)]

use hwc_core::errors::ModelError;
use hwc_engine::model::invoke;
use hwc_engine::{
    ActionSpec, Args, CallContext, CostModel, DescriptorBuilder, EnergyLatency, ModelCore,
    ModelEntry, ModelType, Params,
};

// ---- Leaf: fixed energy/latency per op ----

#[derive(Debug)]
pub struct Leaf {
    core: ModelCore,
    energy: f64,
    latency: f64,
    width: f64,
}

impl Leaf {
    pub fn new(energy: f64, latency: f64) -> Self {
        Self::with_area_leak(energy, latency, 1.0, 1e-3)
    }

    pub fn with_area_leak(energy: f64, latency: f64, area: f64, leak_power: f64) -> Self {
        Self {
            core: ModelCore::leaf::<Self>(area, leak_power).unwrap(),
            energy,
            latency,
            width: 8.0,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn boxed(self) -> Box<dyn CostModel> {
        Box::new(self)
    }
}

impl ModelType for Leaf {
    fn describe() -> DescriptorBuilder {
        DescriptorBuilder::new("Leaf")
            .priority(0.5)
            .optional("op_energy", 1.0)
            .optional("op_latency", 1.0)
            .optional("cell_area", 1.0)
            .optional("static_power", 1e-3)
            .optional("width", 8)
            .action(ActionSpec::new("op").bits_per_action("width"))
            .action(ActionSpec::new("silent"))
            .action(ActionSpec::new("twice"))
            .action(ActionSpec::new("wide"))
            .action(ActionSpec::new("widthless").bits_per_action("depth"))
    }

    fn construct(args: &Args) -> Result<Self, ModelError> {
        Ok(Self::with_area_leak(
            args.f64("op_energy")?,
            args.f64("op_latency")?,
            args.f64("cell_area")?,
            args.f64("static_power")?,
        )
        .with_width(args.f64("width")?))
    }
}

impl CostModel for Leaf {
    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.core
    }

    fn run_action(
        &mut self,
        action: &str,
        _args: &Args,
        ctx: &CallContext,
    ) -> Result<Option<EnergyLatency>, ModelError> {
        match action {
            "op" | "widthless" => {
                self.core.log("leaf op");
                Ok(Some(EnergyLatency::new(self.energy, self.latency)))
            }
            "silent" => Ok(None),
            "wide" => {
                let wide = Params::new().with("bits_per_action", 16);
                Ok(Some(invoke(self, "op", &wide, ctx)?))
            }
            "twice" => {
                let first = invoke(self, "op", &Params::new(), ctx)?;
                let second = invoke(self, "op", &Params::new(), ctx)?;
                Ok(Some(first + second))
            }
            other => Err(ModelError::declined(format!("unexpected action {other}"))),
        }
    }

    fn attribute(&self, name: &str) -> Option<f64> {
        (name == "width").then_some(self.width)
    }
}

// ---- Pair: composite of two subcomponents ----

#[derive(Debug)]
pub struct Pair {
    core: ModelCore,
    own: EnergyLatency,
}

impl Pair {
    pub fn new(own: EnergyLatency, first: Leaf, second: Leaf) -> Self {
        Self {
            core: ModelCore::composite::<Self>(vec![first.boxed(), second.boxed()])
                .unwrap()
                .with_leak_power(2e-3),
            own,
        }
    }
}

impl ModelType for Pair {
    fn describe() -> DescriptorBuilder {
        DescriptorBuilder::new("Pair")
            .priority(0.5)
            .action(ActionSpec::new("op"))
            .action(ActionSpec::new("op_pipelined").pipelined())
            .action(ActionSpec::new("quiet"))
            .action(ActionSpec::new("outer"))
    }

    fn construct(_args: &Args) -> Result<Self, ModelError> {
        Ok(Self::new(
            EnergyLatency::new(1.0, 1.0),
            Leaf::new(1.0, 1.0),
            Leaf::new(1.0, 1.0),
        ))
    }
}

impl CostModel for Pair {
    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.core
    }

    fn run_action(
        &mut self,
        action: &str,
        _args: &Args,
        ctx: &CallContext,
    ) -> Result<Option<EnergyLatency>, ModelError> {
        match action {
            "outer" => Ok(Some(invoke(self, "op", &Params::new(), ctx)?)),
            _ => {
                for i in 0..2 {
                    self.core
                        .invoke_subcomponent(i, "op", &Params::new(), ctx)?;
                }
                if action == "quiet" {
                    Ok(None)
                } else {
                    Ok(Some(self.own))
                }
            }
        }
    }
}

// ---- Chain: arbitrarily deep single-child composite ----

#[derive(Debug)]
pub struct Chain {
    core: ModelCore,
}

impl Chain {
    /// `depth` composites above one leaf.
    pub fn build(depth: usize) -> Box<dyn CostModel> {
        let mut node = Leaf::new(1.0, 1.0).boxed();
        for _ in 0..depth {
            node = Box::new(Chain {
                core: ModelCore::composite::<Chain>(vec![node]).unwrap(),
            });
        }
        node
    }
}

impl ModelType for Chain {
    fn describe() -> DescriptorBuilder {
        DescriptorBuilder::new("Chain")
            .priority(0.1)
            .action(ActionSpec::new("op"))
    }

    fn construct(_args: &Args) -> Result<Self, ModelError> {
        Err(ModelError::declined("chains are built directly"))
    }
}

impl CostModel for Chain {
    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.core
    }

    fn run_action(
        &mut self,
        _action: &str,
        _args: &Args,
        ctx: &CallContext,
    ) -> Result<Option<EnergyLatency>, ModelError> {
        self.core
            .invoke_subcomponent(0, "op", &Params::new(), ctx)?;
        Ok(None)
    }
}

// ---- Resolver candidates ----

macro_rules! simple_model {
    ($ty:ident) => {
        #[derive(Debug)]
        pub struct $ty {
            core: ModelCore,
            energy: f64,
        }

        impl CostModel for $ty {
            fn core(&self) -> &ModelCore {
                &self.core
            }

            fn core_mut(&mut self) -> &mut ModelCore {
                &mut self.core
            }

            fn run_action(
                &mut self,
                _action: &str,
                _args: &Args,
                _ctx: &CallContext,
            ) -> Result<Option<EnergyLatency>, ModelError> {
                self.core.log(format!("{} estimating op", stringify!($ty)));
                Ok(Some(EnergyLatency::new(self.energy, 2e-9)))
            }
        }
    };
}

simple_model!(ModelA);
simple_model!(ModelB);
simple_model!(Decliner);
simple_model!(SnakeAdder);
simple_model!(TwinA);
simple_model!(TwinB);

/// Priority 0.9, requires `width`, supports `op` and `special`.
impl ModelType for ModelA {
    fn describe() -> DescriptorBuilder {
        DescriptorBuilder::new("ModelA")
            .component_name("widget")
            .priority(0.9)
            .required("width")
            .action(ActionSpec::new("op"))
            .action(ActionSpec::new("special"))
    }

    fn construct(args: &Args) -> Result<Self, ModelError> {
        let width = args.f64("width")?;
        Ok(Self {
            core: ModelCore::leaf::<Self>(width * 1e-12, 1e-3)?,
            energy: width * 1e-12,
        })
    }
}

/// Priority 0.5, no required parameters, supports `op`.
impl ModelType for ModelB {
    fn describe() -> DescriptorBuilder {
        DescriptorBuilder::new("ModelB")
            .component_name("widget")
            .priority(0.5)
            .optional("width", 4)
            .action(ActionSpec::new("op"))
    }

    fn construct(_args: &Args) -> Result<Self, ModelError> {
        Ok(Self {
            core: ModelCore::leaf::<Self>(1e-12, 1e-3)?,
            energy: 1e-13,
        })
    }
}

/// Priority 0.95, always declines at construction.
impl ModelType for Decliner {
    fn describe() -> DescriptorBuilder {
        DescriptorBuilder::new("Decliner")
            .component_name("widget")
            .priority(0.95)
            .action(ActionSpec::new("op"))
    }

    fn construct(_args: &Args) -> Result<Self, ModelError> {
        Err(ModelError::declined("widget too coarse for this model"))
    }
}

impl ModelType for SnakeAdder {
    fn describe() -> DescriptorBuilder {
        DescriptorBuilder::new("SnakeAdder")
            .component_names(["snake_adder", "adder"])
            .priority(0.3)
            .action(ActionSpec::new("add"))
    }

    fn construct(_args: &Args) -> Result<Self, ModelError> {
        Ok(Self {
            core: ModelCore::leaf::<Self>(3e-12, 1e-4)?,
            energy: 5e-14,
        })
    }
}

macro_rules! twin_model {
    ($ty:ident, $energy:expr) => {
        /// Same alias and priority as its twin; only the energy differs.
        impl ModelType for $ty {
            fn describe() -> DescriptorBuilder {
                DescriptorBuilder::new(stringify!($ty))
                    .component_name("twin")
                    .priority(0.4)
                    .action(ActionSpec::new("op"))
            }

            fn construct(_args: &Args) -> Result<Self, ModelError> {
                Ok(Self {
                    core: ModelCore::leaf::<Self>(1e-12, 1e-3)?,
                    energy: $energy,
                })
            }
        }
    };
}

twin_model!(TwinA, 1.0);
twin_model!(TwinB, 2.0);

/// A leaf that returns `None`: a plugin bug.
#[derive(Debug)]
pub struct Forgetful {
    core: ModelCore,
}

impl ModelType for Forgetful {
    fn describe() -> DescriptorBuilder {
        DescriptorBuilder::new("Forgetful")
            .component_name("widget")
            .priority(1.0)
            .action(ActionSpec::new("op"))
    }

    fn construct(_args: &Args) -> Result<Self, ModelError> {
        Ok(Self {
            core: ModelCore::leaf::<Self>(0.0, 0.0)?,
        })
    }
}

impl CostModel for Forgetful {
    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.core
    }

    fn run_action(
        &mut self,
        _action: &str,
        _args: &Args,
        _ctx: &CallContext,
    ) -> Result<Option<EnergyLatency>, ModelError> {
        Ok(None)
    }
}

pub fn entry<M: ModelType>() -> ModelEntry {
    ModelEntry::of::<M>().unwrap()
}

pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1e-30)
}
