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

use approx::assert_relative_eq;
use lumen_agents::{AgentError, BlockError, CodecAgent};
use lumen_core::math::LinearRgba;
use lumen_core::{
    CodecConfig, DecodeError, EncodeError, Field, FieldType, FieldValue, Node, RegistryBuilder,
    Variant,
};
use lumen_data::{register_area_light, AreaLight, LightView, PointLight, SpotLight};
use std::sync::Arc;

/// A vendor extension that exists only in these tests.
#[derive(Debug, Clone, PartialEq)]
struct Fog {
    density: f32,
    tint: LinearRgba,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            density: 0.1,
            tint: LinearRgba::WHITE,
        }
    }
}

impl Variant for Fog {
    const KIND: &'static str = "VENDOR_fog";

    fn fields() -> &'static [Field<Self>] {
        static FIELDS: [Field<Fog>; 2] = [
            Field {
                name: "density",
                ty: FieldType::NON_NEGATIVE,
                default: Some(FieldValue::Float(0.1)),
                get: |f| FieldValue::Float(f.density),
                set: |f, v| f.density = v.as_float().unwrap_or(f.density),
            },
            Field {
                name: "tint",
                ty: FieldType::Rgba,
                default: Some(FieldValue::Color(LinearRgba::WHITE)),
                get: |f| FieldValue::Color(f.tint),
                set: |f, v| f.tint = v.as_color().unwrap_or(f.tint),
            },
        ];
        &FIELDS
    }
}

const MIXED_BLOCK: &str = r#"{
    "asset": {"version": "2.0"},
    "lights": [
        {"type": "point", "name": "bulb", "intensity": 2},
        {"type": "VENDOR_laser", "beam": [1, 2, 3]},
        {"type": "spot", "outerConeAngle": "wide"},
        42,
        {"width": 4, "type": "area", "height": 1}
    ]
}"#;

#[test]
fn lenient_block_keeps_every_sibling() {
    // --- 1. ARRANGE ---
    let agent = CodecAgent::default();

    // --- 2. ACT ---
    let block = agent.decode_block(MIXED_BLOCK).unwrap();

    // --- 3. ASSERT ---
    assert_eq!(block.lights.len(), 3);
    assert_eq!(block.skipped, 1);
    assert_eq!(block.errors.len(), 1);
    assert_eq!(block.errors[0].index, 3);
    assert!(!block.is_clean());

    assert_eq!(block.lights[0].name(), Some("bulb"));
    match LightView::of(&block.lights[1]) {
        LightView::Spot(spot) => assert_relative_eq!(
            spot.outer_cone_angle,
            std::f32::consts::FRAC_PI_4
        ),
        other => panic!("expected a spot light, got {other:?}"),
    }
    assert_eq!(
        block.lights[2].variant::<AreaLight>(),
        Some(&AreaLight::new(4.0, 1.0))
    );
}

#[test]
fn strict_block_reports_failures_by_index() {
    let agent = CodecAgent::new(CodecConfig::strict());
    let block = agent.decode_block(MIXED_BLOCK).unwrap();

    assert_eq!(block.lights.len(), 2);
    assert_eq!(block.skipped, 0);
    let indices: Vec<usize> = block.errors.iter().map(|e| e.index).collect();
    assert_eq!(indices, [1, 2, 3]);
    assert_eq!(
        block.errors[0],
        BlockError {
            index: 1,
            error: DecodeError::UnknownDiscriminant("VENDOR_laser".to_string()),
        }
    );
}

#[test]
fn malformed_block_aborts() {
    let agent = CodecAgent::default();
    for json in [
        r#"{"lights": [{"type": "point"}, {"type": "spot""#,
        r#"{"lights": {"type": "point"}}"#,
        r#"[{"type": "point"}]"#,
        r#"{"lights": []} trailing"#,
    ] {
        let err = agent.decode_block(json).unwrap_err();
        assert!(
            matches!(err, AgentError::Decode(DecodeError::MalformedDocument(_))),
            "{json}"
        );
    }
}

#[test]
fn block_without_lights_is_empty() {
    let agent = CodecAgent::default();
    let block = agent.decode_block(r#"{"scenes": [0]}"#).unwrap();
    assert!(block.lights.is_empty());
    assert!(block.is_empty());
    assert!(block.is_clean());
}

#[test]
fn overflowing_number_stays_local_to_its_light() {
    // --- 1. ARRANGE ---
    let json = r#"{"lights":[{"type":"point","intensity":1e400},{"type":"point","name":"next"}]}"#;

    // --- 2. ACT ---
    let lenient = CodecAgent::default().decode_block(json).unwrap();
    let strict = CodecAgent::new(CodecConfig::strict())
        .decode_block(json)
        .unwrap();

    // --- 3. ASSERT ---
    assert_eq!(lenient.lights.len(), 2);
    assert_eq!(
        lenient.lights[0].variant::<PointLight>(),
        Some(&PointLight::default())
    );
    assert_eq!(lenient.lights[1].name(), Some("next"));

    assert_eq!(strict.lights.len(), 1);
    assert_eq!(strict.lights[0].name(), Some("next"));
    assert_eq!(strict.errors.len(), 1);
    assert_eq!(strict.errors[0].index, 0);
    assert!(matches!(
        &strict.errors[0].error,
        DecodeError::InvalidFieldValue { field, .. } if field == "intensity"
    ));
}

#[test]
fn repeated_lights_arrays_keep_counting_positions() {
    let agent = CodecAgent::new(CodecConfig::strict());
    let block = agent
        .decode_block(
            r#"{"lights":[{"type":"point"},42],"asset":{},"lights":[{"type":"VENDOR_x"},{"type":"spot"}]}"#,
        )
        .unwrap();

    assert_eq!(block.len(), 4);
    assert_eq!(block.lights.len(), 2);
    let indices: Vec<usize> = block.errors.iter().map(|e| e.index).collect();
    assert_eq!(indices, [1, 2]);
}

#[test]
fn block_is_decoded_from_a_buffered_reader() {
    let json = r#"{"lights": [{"type": "directional", "intensity": 2}, {"type": "area", "width": 1, "height": 2}]}"#;
    let input = std::io::BufReader::with_capacity(4, json.as_bytes());

    let block = CodecAgent::default().decode_block_from(input).unwrap();

    assert_eq!(block, CodecAgent::default().decode_block(json).unwrap());
    assert_eq!(block.lights.len(), 2);
}

#[test]
fn block_round_trip_is_canonical() {
    let agent = CodecAgent::default();
    let block = agent
        .decode_block(
            r#"{"lights":[{"name":"key","intensity":1.0,"type":"spot","innerConeAngle":0.25},{"type":"area","height":2,"width":5,"color":[1,1,1]}]}"#,
        )
        .unwrap();

    let compact = agent.encode_block(&block.lights, false).unwrap();
    assert_eq!(
        compact,
        r#"{"lights":[{"type":"spot","innerConeAngle":0.25,"name":"key"},{"type":"area","width":5.0,"height":2.0}]}"#
    );

    let pretty = agent.encode_block(&block.lights[1..], true).unwrap();
    assert_eq!(
        pretty,
        "{\n  \"lights\": [\n    {\n      \"type\": \"area\",\n      \"width\": 5.0,\n      \"height\": 2.0\n    }\n  ]\n}"
    );

    assert_eq!(agent.decode_block(&compact).unwrap().lights, block.lights);
}

#[test]
fn encode_block_refuses_non_finite_lights() {
    let agent = CodecAgent::default();
    let lights = [
        Node::new(PointLight::default()),
        Node::new(SpotLight {
            inner_cone_angle: f32::NAN,
            ..Default::default()
        }),
    ];
    let err = agent.encode_block(&lights, false).unwrap_err();
    assert!(matches!(
        err,
        AgentError::Encode(EncodeError::UnencodableValue {
            field: "innerConeAngle",
            ..
        })
    ));
}

#[test]
fn custom_extension_registers_without_touching_the_core() {
    // --- 1. ARRANGE ---
    let mut builder = RegistryBuilder::new();
    register_area_light(&mut builder);
    builder.register::<Fog>();
    let agent = CodecAgent::with_extensions(CodecConfig::strict(), builder.build());

    // --- 2. ACT ---
    let node = agent
        .decode_light(r#"{"type":"VENDOR_fog","tint":[0.5,0.5,0.5,0.5]}"#)
        .unwrap()
        .unwrap();
    let json = agent.encode_light(&node).unwrap();

    // --- 3. ASSERT ---
    assert_eq!(
        node.variant::<Fog>(),
        Some(&Fog {
            density: 0.1,
            tint: LinearRgba::new(0.5, 0.5, 0.5, 0.5),
        })
    );
    assert_eq!(LightView::of(&node), LightView::Other);
    // An Rgba field keeps its alpha on the wire.
    assert_eq!(json, r#"{"type":"VENDOR_fog","tint":[0.5,0.5,0.5,0.5]}"#);
}

#[test]
fn agent_is_shared_across_threads() {
    let agent = Arc::new(CodecAgent::default());
    let documents = [
        r#"{"type":"point","intensity":2}"#,
        r#"{"type":"directional"}"#,
        r#"{"type":"area","width":1,"height":3}"#,
        r#"{"type":"VENDOR_unknown"}"#,
    ];

    std::thread::scope(|scope| {
        let handles: Vec<_> = documents
            .iter()
            .map(|json| {
                let agent = Arc::clone(&agent);
                scope.spawn(move || agent.decode_light(json).map(|node| node.is_some()))
            })
            .collect();
        let resolved: Vec<bool> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect();
        assert_eq!(resolved, [true, true, true, false]);
    });
}
