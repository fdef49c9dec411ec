//! Diarization service (C5): hybrid audio+text speaker segmentation into
//! Promotor/Patient roles.

mod features;
mod pipeline;
mod segment;
mod text_score;
mod wav;

pub use features::{cluster_two, extract_features, FeatureVector};
pub use pipeline::{diarize, AudioSegment, DiarizationOutput};
pub use segment::{decide_role, merge_short_segments, resolve_cluster_mapping, ClusterMapping};
pub use text_score::{has_unambiguous_pattern, text_score};
pub use wav::{decode_wav, slice_segments, DecodedAudio};
