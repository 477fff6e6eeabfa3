use hwc_core::errors::ModelError;

use crate::descriptor::{ActionSpec, Args, DescriptorBuilder};
use crate::estimation::EnergyLatency;
use crate::model::{CallContext, CostModel, ModelCore, ModelType};
use crate::scaling::ScaleFn;

/// Node the nominal numbers were characterized at.
const NOMINAL_TECH_NODE: f64 = 40e-9;

/// Multiply-accumulate unit for ternary weights.
#[derive(Debug)]
pub struct TernaryMac {
    core: ModelCore,
    accum_datawidth: f64,
    tech_node: f64,
}

impl TernaryMac {
    pub fn accum_datawidth(&self) -> f64 {
        self.accum_datawidth
    }

    pub fn tech_node(&self) -> f64 {
        self.tech_node
    }
}

impl ModelType for TernaryMac {
    fn describe() -> DescriptorBuilder {
        DescriptorBuilder::new("TernaryMac")
            .component_name("TernaryMAC")
            .priority(0.8)
            .required("accum_datawidth")
            .required("tech_node")
            .action(
                ActionSpec::new("mac")
                    .optional("clock_gated", false)
                    .bits_per_action("accum_datawidth"),
            )
    }

    fn construct(args: &Args) -> Result<Self, ModelError> {
        let width = args.f64("accum_datawidth")?;
        let mut core = ModelCore::leaf::<Self>(5e-12 * width, 1e-3 * width)?;
        let tech_node = core.scale(
            "tech_node",
            args.f64("tech_node")?,
            NOMINAL_TECH_NODE,
            &ScaleFn::tech_node_rules(),
        )?;
        if !(4.0..=8.0).contains(&width) {
            return Err(ModelError::declined(format!(
                "Accumulation datawidth {width} outside supported range [4, 8]!"
            )));
        }
        Ok(Self {
            core,
            accum_datawidth: width,
            tech_node,
        })
    }
}

impl CostModel for TernaryMac {
    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.core
    }

    fn run_action(
        &mut self,
        action: &str,
        args: &Args,
        _ctx: &CallContext,
    ) -> Result<Option<EnergyLatency>, ModelError> {
        match action {
            "mac" => {
                self.core.log("TernaryMac is estimating energy for mac.");
                if args.bool("clock_gated")? {
                    return Ok(Some(EnergyLatency::ZERO));
                }
                Ok(Some(EnergyLatency::energy(
                    0.002e-12 * (self.accum_datawidth + 0.25),
                )))
            }
            _ => Err(ModelError::UnknownAction {
                model: self.name().to_string(),
                action: action.to_string(),
                supported: self.core.descriptor().action_names().join(", "),
            }),
        }
    }

    fn attribute(&self, name: &str) -> Option<f64> {
        match name {
            "accum_datawidth" => Some(self.accum_datawidth),
            "tech_node" => Some(self.tech_node),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::invoke;
    use crate::value::Params;

    fn build(width: i64, tech_node: f64) -> Result<TernaryMac, ModelError> {
        let descriptor = TernaryMac::describe().build().unwrap();
        let args = descriptor
            .constructor()
            .bind(
                &Params::new()
                    .with("accum_datawidth", width)
                    .with("tech_node", tech_node),
            )
            .unwrap();
        TernaryMac::construct(&args)
    }

    #[test]
    fn test_mac_energy_at_nominal_node() {
        let mut mac = build(8, 40e-9).unwrap();
        let pair = invoke(&mut mac, "mac", &Params::new(), &CallContext::default()).unwrap();
        assert!((pair.energy - 0.002e-12 * 8.25).abs() < 1e-24);
        assert_eq!(pair.latency, 0.0);
    }

    #[test]
    fn test_clock_gated_mac_is_free() {
        let mut mac = build(4, 40e-9).unwrap();
        let args = Params::new().with("clock_gated", true);
        let pair = invoke(&mut mac, "mac", &args, &CallContext::default()).unwrap();
        assert_eq!(pair, EnergyLatency::ZERO);
    }

    #[test]
    fn test_declines_wide_accumulators() {
        let err = build(16, 40e-9).unwrap_err();
        assert!(matches!(err, ModelError::Declined(_)));
        assert!(err.to_string().contains("outside supported range [4, 8]"));
    }

    #[test]
    fn test_smaller_node_scales_energy_down() {
        let mut nominal = build(8, 40e-9).unwrap();
        let mut scaled = build(8, 7e-9).unwrap();
        let ctx = CallContext::default();
        let e0 = invoke(&mut nominal, "mac", &Params::new(), &ctx).unwrap().energy;
        let e1 = invoke(&mut scaled, "mac", &Params::new(), &ctx).unwrap().energy;
        assert!(e1 < e0);
    }
}
