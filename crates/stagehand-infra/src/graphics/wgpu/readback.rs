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

//! Layout helpers for copying a texture into a mappable buffer.

/// Bytes per row of a copy of `width` RGBA8 texels, padded to the copy
/// alignment.
pub(crate) fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Strips row padding from a mapped copy and converts BGRA texels to RGBA.
pub(crate) fn unpad_rows(
    mapped: &[u8],
    padded_row: u32,
    width: u32,
    height: u32,
    bgra: bool,
) -> Vec<u8> {
    let row = (width * 4) as usize;
    let mut rgba = Vec::with_capacity(row * height as usize);
    for chunk in mapped.chunks(padded_row as usize).take(height as usize) {
        rgba.extend_from_slice(&chunk[..row]);
    }
    if bgra {
        for texel in rgba.chunks_exact_mut(4) {
            texel.swap(0, 2);
        }
    }
    rgba
}

/// Whether texels of `format` are stored blue first.
pub(crate) fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}
