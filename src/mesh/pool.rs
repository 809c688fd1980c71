//! Reusable buffer pools
//!
//! Mesh passes acquire their working buffers from a [`BufferPool`] and hand
//! them back on apply, so repeated rebuilds reuse the same allocations. The
//! pool is an ordinary value: share it between rayon workers by reference.

use std::sync::{Mutex, PoisonError};

use glam::{Vec2, Vec3, Vec4};

/// Free list of empty `Vec<T>` buffers
#[derive(Debug)]
pub struct ListPool<T> {
    free: Mutex<Vec<Vec<T>>>,
}

impl<T> Default for ListPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListPool<T> {
    pub fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Take an empty buffer, allocating when the free list is exhausted
    pub fn get(&self) -> Vec<T> {
        let reused = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        match reused {
            Some(list) => list,
            None => {
                log::trace!("ListPool<{}>: allocating new buffer", std::any::type_name::<T>());
                Vec::new()
            }
        }
    }

    /// Return a buffer; its contents are dropped, its capacity kept
    pub fn add(&self, mut list: Vec<T>) {
        list.clear();
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(list);
    }

    /// Number of idle buffers
    pub fn len(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Element types that have a free list in [`BufferPool`]
pub trait Pooled: Sized {
    fn list_pool(pool: &BufferPool) -> &ListPool<Self>;
}

/// Free lists for every buffer element type used by mesh building
#[derive(Debug, Default)]
pub struct BufferPool {
    vec3: ListPool<Vec3>,
    vec4: ListPool<Vec4>,
    vec2: ListPool<Vec2>,
    indices: ListPool<u32>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get<T: Pooled>(&self) -> Vec<T> {
        T::list_pool(self).get()
    }

    #[inline]
    pub fn add<T: Pooled>(&self, list: Vec<T>) {
        T::list_pool(self).add(list)
    }

    /// Total idle buffers across all element types
    pub fn idle_count(&self) -> usize {
        self.vec3.len() + self.vec4.len() + self.vec2.len() + self.indices.len()
    }
}

impl Pooled for Vec3 {
    fn list_pool(pool: &BufferPool) -> &ListPool<Self> {
        &pool.vec3
    }
}

impl Pooled for Vec4 {
    fn list_pool(pool: &BufferPool) -> &ListPool<Self> {
        &pool.vec4
    }
}

impl Pooled for Vec2 {
    fn list_pool(pool: &BufferPool) -> &ListPool<Self> {
        &pool.vec2
    }
}

impl Pooled for u32 {
    fn list_pool(pool: &BufferPool) -> &ListPool<Self> {
        &pool.indices
    }
}
