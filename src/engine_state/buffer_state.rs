//! # Buffer State Module
//!
//! This module defines the seam between the voxel world and the GPU. Chunks
//! never touch a graphics API directly: they hand raw vertex and index bytes
//! to a [`GpuBufferSink`] and keep the opaque [`BufferHandle`] it returns.
//!
//! ## Architecture
//!
//! * [`GpuBufferSink`] is implemented by the embedding renderer
//! * [`RecordingBufferSink`] keeps every buffer in memory and records draws,
//!   which is what the headless demo, the tests and the benches run against
//! * Usage analytics per buffer help spot excessive re-uploads
//!
//! ## Thread Safety
//!
//! Sinks are not required to be `Send`. All calls are made from the thread
//! that owns the world, after every worker of a load pass has joined.

use std::collections::HashMap;

/// Opaque identifier of a vertex/index buffer pair owned by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(u64);

impl BufferHandle {
    pub const fn new(id: u64) -> Self {
        BufferHandle(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// GPU buffer primitives the world relies on.
pub trait GpuBufferSink {
    /// Creates a vertex and an index buffer initialized with the given bytes.
    fn allocate(&mut self, vertex_bytes: &[u8], index_bytes: &[u8]) -> BufferHandle;

    /// Replaces the contents of an existing buffer pair.
    fn upload(&mut self, handle: BufferHandle, vertex_bytes: &[u8], index_bytes: &[u8]);

    /// Frees a buffer pair. The handle is not used again.
    fn release(&mut self, handle: BufferHandle);

    /// Issues one indexed draw of the first `index_count` indices.
    fn draw_indexed(&mut self, handle: BufferHandle, index_count: u32);
}

/// Analytics data for a recorded buffer pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferAnalytics {
    /// Current size of the vertex and index data in bytes
    pub used_memory: u64,
    /// Number of times the buffer pair has been written to, including allocation
    pub times_written: u64,
}

#[derive(Debug, Clone)]
struct RecordedBuffer {
    vertices: Vec<u8>,
    indices: Vec<u8>,
    analytics: BufferAnalytics,
}

/// In-memory [`GpuBufferSink`] that records everything it is asked to do.
#[derive(Debug, Default)]
pub struct RecordingBufferSink {
    buffers: HashMap<BufferHandle, RecordedBuffer>,
    draws: Vec<(BufferHandle, u32)>,
    next_id: u64,
    released: u64,
}

impl RecordingBufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffer pairs currently allocated.
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Number of buffer pairs released so far.
    pub fn released_buffers(&self) -> u64 {
        self.released
    }

    pub fn contains(&self, handle: BufferHandle) -> bool {
        self.buffers.contains_key(&handle)
    }

    /// The last bytes written to `handle`, as `(vertex_bytes, index_bytes)`.
    pub fn contents(&self, handle: BufferHandle) -> Option<(&[u8], &[u8])> {
        self.buffers
            .get(&handle)
            .map(|b| (b.vertices.as_slice(), b.indices.as_slice()))
    }

    pub fn analytics(&self, handle: BufferHandle) -> Option<&BufferAnalytics> {
        self.buffers.get(&handle).map(|b| &b.analytics)
    }

    /// Draws issued since the last call to [`RecordingBufferSink::take_draws`].
    pub fn draws(&self) -> &[(BufferHandle, u32)] {
        &self.draws
    }

    /// Returns and clears the recorded draws; used once per frame.
    pub fn take_draws(&mut self) -> Vec<(BufferHandle, u32)> {
        std::mem::take(&mut self.draws)
    }

    /// Sum of the bytes held by every live buffer pair.
    pub fn total_used_memory(&self) -> u64 {
        self.buffers.values().map(|b| b.analytics.used_memory).sum()
    }
}

impl GpuBufferSink for RecordingBufferSink {
    fn allocate(&mut self, vertex_bytes: &[u8], index_bytes: &[u8]) -> BufferHandle {
        let handle = BufferHandle::new(self.next_id);
        self.next_id += 1;
        self.buffers.insert(
            handle,
            RecordedBuffer {
                vertices: vertex_bytes.to_vec(),
                indices: index_bytes.to_vec(),
                analytics: BufferAnalytics {
                    used_memory: (vertex_bytes.len() + index_bytes.len()) as u64,
                    times_written: 1,
                },
            },
        );
        handle
    }

    fn upload(&mut self, handle: BufferHandle, vertex_bytes: &[u8], index_bytes: &[u8]) {
        match self.buffers.get_mut(&handle) {
            Some(buffer) => {
                buffer.vertices.clear();
                buffer.vertices.extend_from_slice(vertex_bytes);
                buffer.indices.clear();
                buffer.indices.extend_from_slice(index_bytes);
                buffer.analytics.used_memory = (vertex_bytes.len() + index_bytes.len()) as u64;
                buffer.analytics.times_written += 1;
            }
            None => log::warn!("Upload to unknown buffer {:?} ignored", handle),
        }
    }

    fn release(&mut self, handle: BufferHandle) {
        if self.buffers.remove(&handle).is_some() {
            self.released += 1;
        } else {
            log::warn!("Release of unknown buffer {:?} ignored", handle);
        }
    }

    fn draw_indexed(&mut self, handle: BufferHandle, index_count: u32) {
        self.draws.push((handle, index_count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_buffer_lifecycle() {
        let mut sink = RecordingBufferSink::new();
        let a = sink.allocate(&[1, 2, 3], &[4]);
        let b = sink.allocate(&[], &[]);
        assert_ne!(a, b);
        assert_eq!(sink.live_buffers(), 2);
        assert_eq!(sink.total_used_memory(), 4);

        sink.upload(a, &[9; 8], &[7; 4]);
        assert_eq!(sink.contents(a), Some((&[9u8; 8][..], &[7u8; 4][..])));
        assert_eq!(sink.analytics(a).map(|x| x.times_written), Some(2));

        sink.draw_indexed(a, 6);
        assert_eq!(sink.take_draws(), vec![(a, 6)]);
        assert!(sink.draws().is_empty());

        sink.release(a);
        assert!(!sink.contains(a));
        assert_eq!(sink.released_buffers(), 1);
        assert_eq!(sink.live_buffers(), 1);
    }
}
