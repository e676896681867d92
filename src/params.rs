use std::collections::HashMap;

use serde::Deserialize;

use crate::math::{Spectrum, Vec3};

/// A single named construction parameter.
///
/// Scene descriptions carry these as free-form maps; every concrete
/// BSDF/light/integrator pulls its typed values out once at construction so
/// the generic map never enters the evaluation path.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Float(f32),
    Rgb([f32; 3]),
    Text(String),
}

/// Name→value parameter bag for the type-tag factories.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ParamSet(HashMap<String, ParamValue>);

impl From<HashMap<String, ParamValue>> for ParamSet {
    fn from(values: HashMap<String, ParamValue>) -> Self {
        Self(values)
    }
}

impl ParamSet {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.0.insert(name.into(), ParamValue::Bool(value));
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.0.insert(name.into(), ParamValue::Float(value));
    }

    pub fn set_rgb(&mut self, name: &str, value: [f32; 3]) {
        self.0.insert(name.into(), ParamValue::Rgb(value));
    }

    pub fn set_text(&mut self, name: &str, value: &str) {
        self.0.insert(name.into(), ParamValue::Text(value.into()));
    }

    pub fn bool(&self, name: &str, default: bool) -> bool {
        match self.0.get(name) {
            Some(ParamValue::Bool(v)) => *v,
            Some(_) => {
                vermeer_warn!("Parameter '{}' is not a bool, using default", name);
                default
            }
            None => default,
        }
    }

    pub fn float(&self, name: &str, default: f32) -> f32 {
        match self.0.get(name) {
            Some(ParamValue::Float(v)) => *v,
            Some(_) => {
                vermeer_warn!("Parameter '{}' is not a float, using default", name);
                default
            }
            None => default,
        }
    }

    /// Looks up an rgb triple, also accepting a single float as a uniform value.
    pub fn spectrum(&self, name: &str, default: Spectrum) -> Spectrum {
        match self.0.get(name) {
            Some(ParamValue::Rgb(v)) => Spectrum::new(v[0], v[1], v[2]),
            Some(ParamValue::Float(v)) => Spectrum::from(*v),
            Some(_) => {
                vermeer_warn!("Parameter '{}' is not a spectrum, using default", name);
                default
            }
            None => default,
        }
    }

    pub fn vector(&self, name: &str, default: Vec3) -> Vec3 {
        match self.0.get(name) {
            Some(ParamValue::Rgb(v)) => Vec3::new(v[0], v[1], v[2]),
            Some(_) => {
                vermeer_warn!("Parameter '{}' is not a vector, using default", name);
                default
            }
            None => default,
        }
    }

    pub fn text<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.0.get(name) {
            Some(ParamValue::Text(v)) => v,
            Some(_) => {
                vermeer_warn!("Parameter '{}' is not a string, using default", name);
                default
            }
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_lookups() {
        let mut params = ParamSet::new();
        params.set_float("radius", 2.0);
        params.set_rgb("albedo", [0.1, 0.2, 0.3]);
        params.set_text("distribution", "ggx");
        params.set_bool("two_sided", true);

        assert!(params.bool("two_sided", false));
        assert!(!params.bool("missing", false));
        assert_eq!(params.float("radius", 1.0), 2.0);
        assert_eq!(params.float("missing", 1.0), 1.0);
        assert_eq!(
            params.spectrum("albedo", Spectrum::from(0.5)),
            Spectrum::new(0.1, 0.2, 0.3)
        );
        assert_eq!(params.text("distribution", "beckmann"), "ggx");
        assert_eq!(params.text("missing", "beckmann"), "beckmann");
    }

    #[test]
    fn uniform_spectrum_from_float() {
        let mut params = ParamSet::new();
        params.set_float("albedo", 0.25);
        assert_eq!(params.spectrum("albedo", Spectrum::from(0.5)), Spectrum::from(0.25));
    }
}
