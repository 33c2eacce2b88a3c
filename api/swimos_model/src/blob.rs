// Copyright 2015-2023 Swim Inc.
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

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt::{Display, Formatter};

/// A Binary Large OBject (BLOB) structure for encoding and decoding base-64 data. A wrapper
/// around a `Vec<u8>`.
#[derive(Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct Blob {
    data: Vec<u8>,
}

impl Blob {
    pub fn from_vec(data: Vec<u8>) -> Blob {
        Blob { data }
    }

    /// Decode base-64 encoded data into a [`Blob`].
    pub fn from_encoded(encoded: &str) -> Result<Blob, base64::DecodeError> {
        STANDARD.decode(encoded).map(Blob::from_vec)
    }

    /// Encode the contents as base-64 text.
    pub fn encode_to_string(&self) -> String {
        STANDARD.encode(&self.data)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl From<Vec<u8>> for Blob {
    fn from(data: Vec<u8>) -> Self {
        Blob::from_vec(data)
    }
}

impl AsRef<[u8]> for Blob {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl Display for Blob {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}", self.encode_to_string())
    }
}
