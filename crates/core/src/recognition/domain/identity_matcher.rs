use crate::recognition::domain::detected_face::DetectedFace;
use crate::recognition::domain::recognition_error::RecognitionError;
use crate::roster::domain::member::Member;
use crate::shared::constants::DEFAULT_MATCH_THRESHOLD;

/// Resolves the faces of one photo to enrolled member names.
///
/// Greedy per face, in the order the provider returned them: each face
/// claims the still-unassigned member it is most similar to, provided the
/// similarity is strictly above the threshold. Earlier faces can take an
/// identity a later face would have matched better; this ordering is part
/// of the observable behavior. Ties go to the earliest-enrolled member.
#[derive(Clone, Copy, Debug)]
pub struct IdentityMatcher {
    threshold: f64,
}

impl IdentityMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns recognized names in face order, without duplicates.
    ///
    /// Unmatched faces are dropped. Embeddings of differing dimension are
    /// an error.
    pub fn match_faces(
        &self,
        roster: &[Member],
        faces: &[DetectedFace],
    ) -> Result<Vec<String>, RecognitionError> {
        Ok(self
            .match_faces_detailed(roster, faces)?
            .into_iter()
            .map(|m| m.name)
            .collect())
    }

    /// Like [`match_faces`](Self::match_faces), keeping which face claimed
    /// each name and with what similarity.
    pub fn match_faces_detailed(
        &self,
        roster: &[Member],
        faces: &[DetectedFace],
    ) -> Result<Vec<FaceMatch>, RecognitionError> {
        // Roster indices still available, kept in enrollment order.
        let mut unassigned: Vec<usize> = (0..roster.len()).collect();
        let mut matches = Vec::new();

        for (face_index, face) in faces.iter().enumerate() {
            let mut best: Option<(usize, f64)> = None;
            for (slot, &member_index) in unassigned.iter().enumerate() {
                let similarity = roster[member_index]
                    .embedding
                    .cosine_similarity(&face.embedding)?;
                if best.map_or(true, |(_, best_sim)| similarity > best_sim) {
                    best = Some((slot, similarity));
                }
            }

            match best {
                Some((slot, similarity)) if similarity > self.threshold => {
                    let name = roster[unassigned[slot]].name.clone();
                    log::debug!("Face {face_index} matched {name} ({similarity:.3})");
                    unassigned.retain(|&i| roster[i].name != name);
                    matches.push(FaceMatch {
                        face_index,
                        name,
                        similarity,
                    });
                }
                Some((_, similarity)) => {
                    log::debug!("Face {face_index} unmatched (best {similarity:.3})");
                }
                None => {
                    log::debug!("Face {face_index} unmatched (no members left)");
                }
            }
        }

        Ok(matches)
    }
}

/// One accepted face-to-member assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceMatch {
    pub face_index: usize,
    pub name: String,
    pub similarity: f64,
}

impl Default for IdentityMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}
