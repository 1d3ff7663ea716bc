//! Generational heap model
//!
//! The heap is divided into two spaces:
//! - New space: short-lived objects, may be moved or reclaimed at any scavenge
//! - Old space: long-lived objects, safe to reference from permanent metadata
//!
//! Objects never change space in place; promotion produces a distinct copy.
//!
//! New-space requests draw on a nursery budget. Once it is spent they are
//! served from old space until [`Heap::scavenge`] releases the budget.
//! Objects already handed out keep the space they were allocated in.

use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::HeapConfig;
use crate::logging::{log_pretenured, log_scavenge};
use crate::runtime::objects::{Instance, ObjectData};

/// Heap region an object was allocated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Space {
    New,
    Old,
}

/// Heap-resident object
#[derive(Debug)]
pub struct HeapObject {
    data: ObjectData,
    space: Space,
    canonical: bool,
}

impl HeapObject {
    #[inline]
    pub fn data(&self) -> &ObjectData {
        &self.data
    }

    #[inline]
    pub fn space(&self) -> Space {
        self.space
    }

    #[inline]
    pub fn is_new(&self) -> bool {
        self.space == Space::New
    }

    #[inline]
    pub fn is_old(&self) -> bool {
        self.space == Space::Old
    }

    /// Whether this object is a canonical constant
    #[inline]
    pub fn is_canonical(&self) -> bool {
        self.canonical
    }

    /// Bytes charged to the owning space
    pub fn size(&self) -> usize {
        std::mem::size_of::<Self>() + self.data.payload_size()
    }
}

/// Reference to a heap object; equality is identity
#[derive(Clone)]
pub struct ObjRef(Arc<HeapObject>);

impl ObjRef {
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ObjRef {
    type Target = HeapObject;

    fn deref(&self) -> &HeapObject {
        &self.0
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjRef({:p}, {:?}, {})", Arc::as_ptr(&self.0), self.space, self.data)
    }
}

#[derive(Debug, Default)]
struct SpaceUsage {
    objects: usize,
    bytes: usize,
}

/// Heap statistics for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    pub new_objects: usize,
    pub new_bytes: usize,
    pub old_objects: usize,
    pub old_bytes: usize,
    pub promotions: usize,
    pub pretenured: usize,
    pub scavenges: usize,
}

/// Heap of one runtime group
pub struct Heap {
    nursery_size: usize,
    new_space: Mutex<SpaceUsage>,
    old_space: Mutex<SpaceUsage>,
    promotions: AtomicUsize,
    pretenured: AtomicUsize,
    scavenges: AtomicUsize,
    null: ObjRef,
    true_value: ObjRef,
    false_value: ObjRef,
}

impl Heap {
    pub fn new(config: &HeapConfig) -> Self {
        let mut old_space = SpaceUsage::default();
        let mut singleton = |data| {
            let object = HeapObject { data, space: Space::Old, canonical: true };
            old_space.objects += 1;
            old_space.bytes += object.size();
            ObjRef(Arc::new(object))
        };

        let null = singleton(ObjectData::Null);
        let true_value = singleton(ObjectData::Bool(true));
        let false_value = singleton(ObjectData::Bool(false));

        Self {
            nursery_size: config.nursery_size,
            new_space: Mutex::new(SpaceUsage::default()),
            old_space: Mutex::new(old_space),
            promotions: AtomicUsize::new(0),
            pretenured: AtomicUsize::new(0),
            scavenges: AtomicUsize::new(0),
            null,
            true_value,
            false_value,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&HeapConfig::default())
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Allocate a (non-canonical) object in the requested space
    pub fn allocate(&self, data: ObjectData, space: Space) -> ObjRef {
        self.allocate_object(data, space, false)
    }

    /// Allocate a canonical constant in the requested space
    pub fn allocate_constant(&self, data: ObjectData, space: Space) -> ObjRef {
        self.allocate_object(data, space, true)
    }

    fn allocate_object(&self, data: ObjectData, space: Space, canonical: bool) -> ObjRef {
        let size = std::mem::size_of::<HeapObject>() + data.payload_size();
        let space = match space {
            Space::New if !self.try_reserve_new(size) => Space::Old,
            other => other,
        };

        if space == Space::Old {
            let mut old = self.old_space.lock();
            old.objects += 1;
            old.bytes += size;
        }

        ObjRef(Arc::new(HeapObject { data, space, canonical }))
    }

    fn try_reserve_new(&self, size: usize) -> bool {
        let mut nursery = self.new_space.lock();
        if nursery.bytes + size > self.nursery_size {
            self.pretenured.fetch_add(1, Ordering::Relaxed);
            log_pretenured(size, nursery.bytes);
            return false;
        }
        nursery.objects += 1;
        nursery.bytes += size;
        true
    }

    /// Integer constant: a small integer when it fits, a mint otherwise
    pub fn integer(&self, value: i64, space: Space) -> Instance {
        Instance::smi(value).unwrap_or_else(|| {
            Instance::Object(self.allocate_constant(ObjectData::Mint(value), space))
        })
    }

    /// Double constant
    pub fn double(&self, value: f64, space: Space) -> Instance {
        Instance::Object(self.allocate_constant(ObjectData::Double(value), space))
    }

    pub fn null(&self) -> Instance {
        Instance::Object(self.null.clone())
    }

    pub fn boolean(&self, value: bool) -> Instance {
        let obj = if value { &self.true_value } else { &self.false_value };
        Instance::Object(obj.clone())
    }

    // =========================================================================
    // Promotion
    // =========================================================================

    /// Shallow copy of `obj` into old space
    ///
    /// The copy has equal payload and canonical flag but is a distinct object.
    pub fn copy_shallow_to_old_space(&self, obj: &ObjRef) -> ObjRef {
        let copy = self.allocate_object(obj.data.clone(), Space::Old, obj.canonical);
        self.promotions.fetch_add(1, Ordering::Relaxed);
        copy
    }

    /// Release the nursery budget so new-space requests are served again
    pub fn scavenge(&self) {
        let mut nursery = self.new_space.lock();
        let released = std::mem::take(&mut *nursery);
        self.scavenges.fetch_add(1, Ordering::Relaxed);
        log_scavenge(released.objects, released.bytes);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn nursery_size(&self) -> usize {
        self.nursery_size
    }

    pub fn stats(&self) -> HeapStats {
        let new = self.new_space.lock();
        let old = self.old_space.lock();
        HeapStats {
            new_objects: new.objects,
            new_bytes: new.bytes,
            old_objects: old.objects,
            old_bytes: old.bytes,
            promotions: self.promotions.load(Ordering::Relaxed),
            pretenured: self.pretenured.load(Ordering::Relaxed),
            scavenges: self.scavenges.load(Ordering::Relaxed),
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::with_defaults()
    }
}
