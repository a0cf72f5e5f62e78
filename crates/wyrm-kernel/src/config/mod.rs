//! Pre-construction feature configuration.
//!
//! An embedder builds a [`ConfigureContext`] before creating a VM instance:
//! which optional language proposals are enabled, which built-in host
//! capability bundles are pre-registered, and an optional cap on linear
//! memory growth. The context is exclusively owned by its creator and has no
//! internal locking: build it on one thread, then hand it to VM
//! construction as read-only input.
//!
//! The [`Proposal`] and [`HostRegistration`] ordinals are a versioned ABI
//! surface shared with plugin binaries and serialized configuration; they
//! are never renumbered.

use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration enumerations
// ============================================================================

/// Optional language-feature proposal, enabled per VM instance.
///
/// Discriminants are ABI-stable: new proposals are appended, existing values
/// are never renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Proposal {
    Annotations = 0,
    BulkMemoryOperations = 1,
    ExceptionHandling = 2,
    FunctionReferences = 3,
    Memory64 = 4,
    ReferenceTypes = 5,
    SIMD = 6,
    TailCall = 7,
    Threads = 8,
}

impl Proposal {
    /// All proposals in ordinal order.
    pub const ALL: [Proposal; 9] = [
        Proposal::Annotations,
        Proposal::BulkMemoryOperations,
        Proposal::ExceptionHandling,
        Proposal::FunctionReferences,
        Proposal::Memory64,
        Proposal::ReferenceTypes,
        Proposal::SIMD,
        Proposal::TailCall,
        Proposal::Threads,
    ];

    /// Stable ordinal value of this proposal.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Built-in host-capability bundle pre-registered into a VM instance.
///
/// Same ABI-stability rule as [`Proposal`]: discriminants are permanent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HostRegistration {
    /// WASI system-interface bundle.
    Wasi = 0,
    /// Wyrm process-control bundle.
    Process = 1,
}

impl HostRegistration {
    /// All registrations in ordinal order.
    pub const ALL: [HostRegistration; 2] = [HostRegistration::Wasi, HostRegistration::Process];

    /// Stable ordinal value of this registration.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

// ============================================================================
// Enum sets
// ============================================================================

/// Set of [`Proposal`] values backed by a fixed bit mask keyed on the stable
/// ordinals.
///
/// Insert, remove and membership are O(1) and idempotent. Serializes as a
/// sequence of proposal names, not as the raw mask, so the on-disk form
/// survives ordinal-preserving refactors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Proposal>", into = "Vec<Proposal>")]
pub struct ProposalSet {
    bits: u16,
}

impl ProposalSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Insert a proposal. No effect if already present.
    pub fn insert(&mut self, proposal: Proposal) {
        self.bits |= 1 << proposal.ordinal();
    }

    /// Remove a proposal. No effect if absent.
    pub fn remove(&mut self, proposal: Proposal) {
        self.bits &= !(1 << proposal.ordinal());
    }

    /// Membership test.
    pub const fn contains(&self, proposal: Proposal) -> bool {
        (self.bits & (1 << proposal.ordinal())) != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of proposals in the set.
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterate the members in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = Proposal> + '_ {
        Proposal::ALL.into_iter().filter(|p| self.contains(*p))
    }
}

impl FromIterator<Proposal> for ProposalSet {
    fn from_iter<I: IntoIterator<Item = Proposal>>(iter: I) -> Self {
        let mut set = Self::empty();
        for p in iter {
            set.insert(p);
        }
        set
    }
}

impl From<Vec<Proposal>> for ProposalSet {
    fn from(proposals: Vec<Proposal>) -> Self {
        proposals.into_iter().collect()
    }
}

impl From<ProposalSet> for Vec<Proposal> {
    fn from(set: ProposalSet) -> Self {
        set.iter().collect()
    }
}

/// Set of [`HostRegistration`] values. Same contract as [`ProposalSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<HostRegistration>", into = "Vec<HostRegistration>")]
pub struct HostRegistrationSet {
    bits: u8,
}

impl HostRegistrationSet {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn insert(&mut self, host: HostRegistration) {
        self.bits |= 1 << host.ordinal();
    }

    pub fn remove(&mut self, host: HostRegistration) {
        self.bits &= !(1 << host.ordinal());
    }

    pub const fn contains(&self, host: HostRegistration) -> bool {
        (self.bits & (1 << host.ordinal())) != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = HostRegistration> + '_ {
        HostRegistration::ALL.into_iter().filter(|h| self.contains(*h))
    }
}

impl FromIterator<HostRegistration> for HostRegistrationSet {
    fn from_iter<I: IntoIterator<Item = HostRegistration>>(iter: I) -> Self {
        let mut set = Self::empty();
        for h in iter {
            set.insert(h);
        }
        set
    }
}

impl From<Vec<HostRegistration>> for HostRegistrationSet {
    fn from(hosts: Vec<HostRegistration>) -> Self {
        hosts.into_iter().collect()
    }
}

impl From<HostRegistrationSet> for Vec<HostRegistration> {
    fn from(set: HostRegistrationSet) -> Self {
        set.iter().collect()
    }
}

// ============================================================================
// ConfigureContext
// ============================================================================

/// Feature configuration consumed by VM construction.
///
/// # Example
///
/// ```rust
/// use wyrm_kernel::config::{ConfigureContext, HostRegistration, Proposal};
///
/// let mut conf = ConfigureContext::new();
/// conf.add_proposal(Proposal::BulkMemoryOperations);
/// conf.add_proposal(Proposal::SIMD);
/// conf.add_host_registration(HostRegistration::Wasi);
/// conf.set_max_memory_page(256);
/// assert!(conf.has_proposal(Proposal::SIMD));
/// ```
///
/// Dropping the context releases it; the engine copies what it needs during
/// construction and never retains a reference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigureContext {
    proposals: ProposalSet,
    host_registrations: HostRegistrationSet,
    /// Maximum number of linear-memory pages any memory instance may grow
    /// to; 0 leaves the per-module default in force.
    max_memory_page: u32,
}

impl ConfigureContext {
    /// Create an empty configuration: no proposals, no host registrations,
    /// no memory override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a proposal. Idempotent.
    pub fn add_proposal(&mut self, proposal: Proposal) {
        self.proposals.insert(proposal);
    }

    /// Disable a proposal. Idempotent.
    pub fn remove_proposal(&mut self, proposal: Proposal) {
        self.proposals.remove(proposal);
    }

    /// Whether a proposal is enabled.
    pub fn has_proposal(&self, proposal: Proposal) -> bool {
        self.proposals.contains(proposal)
    }

    /// Enable a host pre-registration bundle. Idempotent.
    pub fn add_host_registration(&mut self, host: HostRegistration) {
        self.host_registrations.insert(host);
    }

    /// Disable a host pre-registration bundle. Idempotent.
    pub fn remove_host_registration(&mut self, host: HostRegistration) {
        self.host_registrations.remove(host);
    }

    /// Whether a host pre-registration bundle is enabled.
    pub fn has_host_registration(&self, host: HostRegistration) -> bool {
        self.host_registrations.contains(host)
    }

    /// Cap the number of linear-memory pages a memory instance may grow to.
    /// 0 restores the per-module default.
    pub fn set_max_memory_page(&mut self, pages: u32) {
        self.max_memory_page = pages;
    }

    /// Current memory-page cap; 0 means no override.
    pub fn max_memory_page(&self) -> u32 {
        self.max_memory_page
    }

    /// Enabled proposals.
    pub fn proposals(&self) -> ProposalSet {
        self.proposals
    }

    /// Enabled host registrations.
    pub fn host_registrations(&self) -> HostRegistrationSet {
        self.host_registrations
    }

    /// Builder form of [`add_proposal`](Self::add_proposal).
    pub fn with_proposal(mut self, proposal: Proposal) -> Self {
        self.add_proposal(proposal);
        self
    }

    /// Builder form of [`add_host_registration`](Self::add_host_registration).
    pub fn with_host_registration(mut self, host: HostRegistration) -> Self {
        self.add_host_registration(host);
        self
    }

    /// Builder form of [`set_max_memory_page`](Self::set_max_memory_page).
    pub fn with_max_memory_page(mut self, pages: u32) -> Self {
        self.set_max_memory_page(pages);
        self
    }
}
