// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the light node family.
//!
//! Directional, point and spot lights form the core table returned by
//! [`core_light_variants`]. The area light is an extension: it only resolves once
//! [`register_area_light`] has added it to an extension registry.
//!
//! Every light stores its color as [`LinearRgba`] but writes it with the
//! [`FieldType::Rgb`] type, so alpha stays in memory and never reaches the wire.

use lumen_core::math::{LinearRgba, FRAC_PI_2, FRAC_PI_4};
use lumen_core::{Field, FieldType, FieldValue, Node, RegistryBuilder, Tag, Variant, VariantRegistry};

/// The default color of every light.
pub const DEFAULT_COLOR: LinearRgba = LinearRgba::WHITE;
/// The default intensity of every light.
pub const DEFAULT_INTENSITY: f32 = 1.0;
/// The default inner cone angle of a spot light, in radians.
pub const DEFAULT_INNER_CONE_ANGLE: f32 = 0.0;
/// The default outer cone angle of a spot light, in radians.
pub const DEFAULT_OUTER_CONE_ANGLE: f32 = FRAC_PI_4;

const CONE_ANGLE: FieldType = FieldType::Float {
    min: 0.0,
    max: FRAC_PI_2,
};

// Rows shared by every light. Each expands to a `Field<$light>` reading the
// light's `color` or `intensity` member.
macro_rules! color_field {
    ($light:ty) => {
        Field::<$light> {
            name: "color",
            ty: FieldType::Rgb,
            default: Some(FieldValue::Color(DEFAULT_COLOR)),
            get: |l| FieldValue::Color(l.color),
            set: |l, v| l.color = v.as_color().unwrap_or(l.color),
        }
    };
}

macro_rules! intensity_field {
    ($light:ty) => {
        Field::<$light> {
            name: "intensity",
            ty: FieldType::NON_NEGATIVE,
            default: Some(FieldValue::Float(DEFAULT_INTENSITY)),
            get: |l| FieldValue::Float(l.intensity),
            set: |l, v| l.intensity = v.as_float().unwrap_or(l.intensity),
        }
    };
}

/// A light that illuminates from a uniform direction.
///
/// Directional lights simulate infinitely distant sources like the sun. The
/// direction comes from the node's transform, which is not part of this codec.
///
/// # Examples
///
/// ```
/// use lumen_core::math::LinearRgba;
/// use lumen_data::DirectionalLight;
///
/// // A warm sunlight
/// let sun = DirectionalLight {
///     color: LinearRgba::rgb(1.0, 0.95, 0.8),
///     intensity: 3.0,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// The color of the light in linear RGB space.
    pub color: LinearRgba,

    /// The intensity multiplier for the light, never negative.
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            intensity: DEFAULT_INTENSITY,
        }
    }
}

impl Variant for DirectionalLight {
    const KIND: &'static str = "directional";

    fn fields() -> &'static [Field<Self>] {
        static FIELDS: [Field<DirectionalLight>; 2] = [
            color_field!(DirectionalLight),
            intensity_field!(DirectionalLight),
        ];
        &FIELDS
    }
}

/// A light that emits in all directions from a single point.
///
/// # Examples
///
/// ```
/// use lumen_core::math::LinearRgba;
/// use lumen_data::PointLight;
///
/// // A warm indoor lamp
/// let lamp = PointLight {
///     color: LinearRgba::rgb(1.0, 0.9, 0.7),
///     ..Default::default()
/// };
/// assert_eq!(lamp.intensity, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// The color of the light in linear RGB space.
    pub color: LinearRgba,

    /// The intensity of the light, never negative.
    pub intensity: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            intensity: DEFAULT_INTENSITY,
        }
    }
}

impl Variant for PointLight {
    const KIND: &'static str = "point";

    fn fields() -> &'static [Field<Self>] {
        static FIELDS: [Field<PointLight>; 2] =
            [color_field!(PointLight), intensity_field!(PointLight)];
        &FIELDS
    }
}

/// A light that emits in a cone from a single point.
///
/// # Examples
///
/// ```
/// use lumen_data::SpotLight;
///
/// // A flashlight
/// let flashlight = SpotLight {
///     inner_cone_angle: 15.0_f32.to_radians(),
///     outer_cone_angle: 30.0_f32.to_radians(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    /// The color of the light in linear RGB space.
    pub color: LinearRgba,

    /// The intensity of the light, never negative.
    pub intensity: f32,

    /// The angle in radians at which the light begins to fall off.
    ///
    /// Within this angle from the center of the cone, the light is at full intensity.
    pub inner_cone_angle: f32,

    /// The angle in radians at which the light is fully attenuated.
    ///
    /// Both angles lie in `0..=pi/2`.
    pub outer_cone_angle: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            intensity: DEFAULT_INTENSITY,
            inner_cone_angle: DEFAULT_INNER_CONE_ANGLE,
            outer_cone_angle: DEFAULT_OUTER_CONE_ANGLE,
        }
    }
}

impl Variant for SpotLight {
    const KIND: &'static str = "spot";

    fn fields() -> &'static [Field<Self>] {
        static FIELDS: [Field<SpotLight>; 4] = [
            color_field!(SpotLight),
            intensity_field!(SpotLight),
            Field {
                name: "innerConeAngle",
                ty: CONE_ANGLE,
                default: Some(FieldValue::Float(DEFAULT_INNER_CONE_ANGLE)),
                get: |l| FieldValue::Float(l.inner_cone_angle),
                set: |l, v| l.inner_cone_angle = v.as_float().unwrap_or(l.inner_cone_angle),
            },
            Field {
                name: "outerConeAngle",
                ty: CONE_ANGLE,
                default: Some(FieldValue::Float(DEFAULT_OUTER_CONE_ANGLE)),
                get: |l| FieldValue::Float(l.outer_cone_angle),
                set: |l, v| l.outer_cone_angle = v.as_float().unwrap_or(l.outer_cone_angle),
            },
        ];
        &FIELDS
    }
}

/// A rectangular emitter, provided as an extension variant.
///
/// `width` and `height` have no default: they are always written, and a
/// document that omits them is rejected in strict mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaLight {
    /// Extent along the local X axis, never negative.
    pub width: f32,
    /// Extent along the local Y axis, never negative.
    pub height: f32,
    /// The color of the light in linear RGB space.
    pub color: LinearRgba,
    /// The intensity of the light, never negative.
    pub intensity: f32,
}

impl AreaLight {
    /// Creates an area light with the default color and intensity.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

impl Default for AreaLight {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            color: DEFAULT_COLOR,
            intensity: DEFAULT_INTENSITY,
        }
    }
}

impl Variant for AreaLight {
    const KIND: &'static str = "area";

    fn fields() -> &'static [Field<Self>] {
        static FIELDS: [Field<AreaLight>; 4] = [
            Field {
                name: "width",
                ty: FieldType::NON_NEGATIVE,
                default: None,
                get: |l| FieldValue::Float(l.width),
                set: |l, v| l.width = v.as_float().unwrap_or(l.width),
            },
            Field {
                name: "height",
                ty: FieldType::NON_NEGATIVE,
                default: None,
                get: |l| FieldValue::Float(l.height),
                set: |l, v| l.height = v.as_float().unwrap_or(l.height),
            },
            color_field!(AreaLight),
            intensity_field!(AreaLight),
        ];
        &FIELDS
    }
}

/// Returns the frozen table of built-in lights: directional, point and spot.
pub fn core_light_variants() -> VariantRegistry {
    let mut builder = RegistryBuilder::new();
    builder.register::<DirectionalLight>();
    builder.register::<PointLight>();
    builder.register::<SpotLight>();
    builder.build()
}

/// Adds the area light to an extension registry under `area`.
pub fn register_area_light(builder: &mut RegistryBuilder) -> Tag {
    log::debug!("Registering area light extension");
    builder.register::<AreaLight>()
}

/// A typed view of a node as a member of the light family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightView<'a> {
    /// A directional light.
    Directional(&'a DirectionalLight),
    /// A point light.
    Point(&'a PointLight),
    /// A spot light.
    Spot(&'a SpotLight),
    /// An area light.
    Area(&'a AreaLight),
    /// Any node that is not a light.
    Other,
}

impl<'a> LightView<'a> {
    /// Classifies `node` by the variant it holds.
    pub fn of(node: &'a Node) -> Self {
        if let Some(light) = node.variant::<DirectionalLight>() {
            LightView::Directional(light)
        } else if let Some(light) = node.variant::<PointLight>() {
            LightView::Point(light)
        } else if let Some(light) = node.variant::<SpotLight>() {
            LightView::Spot(light)
        } else if let Some(light) = node.variant::<AreaLight>() {
            LightView::Area(light)
        } else {
            LightView::Other
        }
    }

    /// Returns the light's color, if this is a light.
    pub fn color(&self) -> Option<LinearRgba> {
        match self {
            LightView::Directional(l) => Some(l.color),
            LightView::Point(l) => Some(l.color),
            LightView::Spot(l) => Some(l.color),
            LightView::Area(l) => Some(l.color),
            LightView::Other => None,
        }
    }

    /// Returns the light's intensity, if this is a light.
    pub fn intensity(&self) -> Option<f32> {
        match self {
            LightView::Directional(l) => Some(l.intensity),
            LightView::Point(l) => Some(l.intensity),
            LightView::Spot(l) => Some(l.intensity),
            LightView::Area(l) => Some(l.intensity),
            LightView::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn names<V: Variant>() -> Vec<&'static str> {
        V::fields().iter().map(|f| f.name).collect()
    }

    #[test]
    fn test_canonical_field_orders() {
        assert_eq!(names::<DirectionalLight>(), ["color", "intensity"]);
        assert_eq!(names::<PointLight>(), ["color", "intensity"]);
        assert_eq!(
            names::<SpotLight>(),
            ["color", "intensity", "innerConeAngle", "outerConeAngle"]
        );
        assert_eq!(names::<AreaLight>(), ["width", "height", "color", "intensity"]);
    }

    #[test]
    fn test_defaults_match_field_tables() {
        let spot = SpotLight::default();
        for field in SpotLight::fields() {
            let default = field.default.expect("spot fields all have defaults");
            assert_eq!((field.get)(&spot), default, "field {}", field.name);
        }
        assert_relative_eq!(spot.outer_cone_angle, std::f32::consts::FRAC_PI_4);
    }

    #[test]
    fn test_area_dimensions_are_required() {
        assert!(AreaLight::field("width").is_some_and(|f| f.is_required()));
        assert!(AreaLight::field("height").is_some_and(|f| f.is_required()));
        assert!(AreaLight::field("color").is_some_and(|f| !f.is_required()));
    }

    #[test]
    fn test_color_never_writes_alpha() {
        for ty in [
            DirectionalLight::field("color").map(|f| f.ty),
            PointLight::field("color").map(|f| f.ty),
            SpotLight::field("color").map(|f| f.ty),
            AreaLight::field("color").map(|f| f.ty),
        ] {
            assert_eq!(ty, Some(FieldType::Rgb));
        }
    }

    #[test]
    fn test_core_table_excludes_area() {
        let core = core_light_variants();
        assert_eq!(core.len(), 3);
        assert!(core.contains("directional"));
        assert!(core.contains("point"));
        assert!(core.contains("spot"));
        assert!(!core.contains("area"));
    }

    #[test]
    fn test_register_area_light() {
        let mut builder = RegistryBuilder::new();
        let tag = register_area_light(&mut builder);
        let extensions = builder.build();
        assert_eq!(tag, Tag::of::<AreaLight>());
        assert_eq!(extensions.resolve("area").map(|e| e.tag), Some(tag));
    }

    #[test]
    fn test_light_view_classifies_nodes() {
        let node = Node::new(AreaLight::new(5.0, 2.0));
        match LightView::of(&node) {
            LightView::Area(area) => assert_eq!(area.width, 5.0),
            other => panic!("expected an area light, got {other:?}"),
        }

        let node = Node::new(PointLight {
            intensity: 4.0,
            ..Default::default()
        });
        assert_eq!(LightView::of(&node).intensity(), Some(4.0));
        assert_eq!(LightView::of(&node).color(), Some(LinearRgba::WHITE));
    }
}
