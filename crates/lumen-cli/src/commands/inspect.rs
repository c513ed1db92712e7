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

use super::{open_input, report_failures};
use anyhow::{Context, Result};
use lumen_agents::{CodecAgent, LightsBlock};
use lumen_core::math::LinearRgba;
use lumen_core::Node;
use lumen_data::LightView;
use std::path::Path;

/// Prints one line per decoded light and a summary line.
pub fn inspect(agent: &CodecAgent, input: &Path) -> Result<()> {
    let block = agent
        .decode_block_from(open_input(input)?)
        .with_context(|| format!("Failed to decode '{}'", input.display()))?;

    for line in describe_block(&block) {
        println!("{line}");
    }
    report_failures(&block);
    Ok(())
}

fn describe_block(block: &LightsBlock) -> Vec<String> {
    let mut lines: Vec<String> = block.lights.iter().map(describe_light).collect();
    lines.push(format!(
        "{} lights, {} skipped, {} failed",
        block.lights.len(),
        block.skipped,
        block.errors.len()
    ));
    lines
}

fn describe_light(node: &Node) -> String {
    let name = node.name().unwrap_or("-");
    let details = match LightView::of(node) {
        LightView::Directional(l) => summary(l.color, l.intensity),
        LightView::Point(l) => summary(l.color, l.intensity),
        LightView::Spot(l) => format!(
            "{} cone={:.3}..{:.3}",
            summary(l.color, l.intensity),
            l.inner_cone_angle,
            l.outer_cone_angle
        ),
        LightView::Area(l) => format!(
            "{} size={}x{}",
            summary(l.color, l.intensity),
            l.width,
            l.height
        ),
        LightView::Other => node.tag().type_name().to_string(),
    };
    format!("{:<12} {:<16} {details}", node.kind(), name)
}

fn summary(color: LinearRgba, intensity: f32) -> String {
    format!(
        "color=[{}, {}, {}] intensity={intensity}",
        color.r, color.g, color.b
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_block() {
        let agent = CodecAgent::default();
        let block = agent
            .decode_block(
                r#"{"lights":[
                    {"type":"spot","name":"key","intensity":2,"outerConeAngle":0.5},
                    {"type":"area","width":5,"height":2},
                    {"type":"VENDOR_x"}
                ]}"#,
            )
            .unwrap();

        let lines = describe_block(&block);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "spot         key              color=[1, 1, 1] intensity=2 cone=0.000..0.500"
        );
        assert_eq!(
            lines[1],
            "area         -                color=[1, 1, 1] intensity=1 size=5x2"
        );
        assert_eq!(lines[2], "2 lights, 1 skipped, 0 failed");
    }

    #[test]
    fn test_inspect_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("lights.json");
        std::fs::write(&input, r#"{"lights":[{"type":"point"}]}"#).unwrap();
        assert!(inspect(&CodecAgent::default(), &input).is_ok());
        assert!(inspect(&CodecAgent::default(), &dir.path().join("absent.json")).is_err());
    }
}
