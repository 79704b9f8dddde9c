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

use std::sync::Arc;

/// The node property an animation track drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackProperty {
    /// `translation`, 3 floats per key.
    Translation,
    /// `rotation`, 4 floats (quaternion) per key.
    Rotation,
    /// `scale`, 3 floats per key.
    Scale,
    /// Morph target weights.
    Weights,
}

/// Keyframes for one property of one node.
///
/// Targets are referenced by node name, so playback resolves them against whatever
/// root the clip is attached to.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTrack {
    /// Name of the animated node.
    pub target: String,
    /// The animated property.
    pub property: TrackProperty,
    /// Key times in seconds.
    pub times: Arc<[f32]>,
    /// Flattened key values.
    pub values: Arc<[f32]>,
}

/// A named set of tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// The clip name.
    pub name: String,
    /// Length in seconds (the latest key time of any track).
    pub duration: f32,
    /// The tracks.
    pub tracks: Vec<AnimationTrack>,
}

impl AnimationClip {
    /// Creates a clip, computing its duration from the tracks.
    pub fn new(name: impl Into<String>, tracks: Vec<AnimationTrack>) -> Self {
        let duration = tracks
            .iter()
            .flat_map(|t| t.times.iter().copied())
            .fold(0.0_f32, f32::max);
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// Iterates the distinct node names the clip animates.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        let mut seen: Vec<&str> = Vec::new();
        self.tracks.iter().filter_map(move |t| {
            if seen.contains(&t.target.as_str()) {
                None
            } else {
                seen.push(t.target.as_str());
                Some(t.target.as_str())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(target: &str, times: &[f32]) -> AnimationTrack {
        AnimationTrack {
            target: target.to_string(),
            property: TrackProperty::Rotation,
            times: times.into(),
            values: vec![0.0; times.len() * 4].into(),
        }
    }

    #[test]
    fn test_duration_and_targets() {
        let clip = AnimationClip::new(
            "wave",
            vec![
                track("Hand_L", &[0.0, 0.5]),
                track("Arm_L", &[0.0, 1.25]),
                track("Hand_L", &[0.0, 0.75]),
            ],
        );
        assert_eq!(clip.duration, 1.25);
        assert_eq!(clip.targets().collect::<Vec<_>>(), vec!["Hand_L", "Arm_L"]);
    }
}
