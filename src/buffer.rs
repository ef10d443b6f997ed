use log::trace;

/// Politique de croissance des tampons d'un chunk.
///
/// Un tampon vide passe à `initial_capacity` au premier ajout, puis sa
/// capacité est multipliée par `factor` à chaque fois qu'il est plein.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    initial_capacity: usize,
    factor: usize,
}

impl GrowthPolicy {
    pub const DEFAULT: GrowthPolicy = GrowthPolicy { initial_capacity: 8, factor: 2 };

    /// `initial_capacity` vaut au moins 1 et `factor` au moins 2, sinon le
    /// tampon ne grandirait jamais.
    pub fn new(initial_capacity: usize, factor: usize) -> Self {
        GrowthPolicy {
            initial_capacity: initial_capacity.max(1),
            factor: factor.max(2),
        }
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    pub fn factor(&self) -> usize {
        self.factor
    }

    pub fn next_capacity(&self, capacity: usize) -> usize {
        let initial = self.initial_capacity.max(1);
        let next = if capacity < initial {
            initial
        } else {
            capacity.saturating_mul(self.factor.max(2))
        };
        next.max(capacity.saturating_add(1))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        GrowthPolicy::DEFAULT
    }
}

/// Tableau dynamique qui suit sa propre capacité logique.
///
/// `Vec` gère la mémoire ; la capacité exposée ici est celle dictée par la
/// politique, ce qui la rend observable dans les tests.
#[derive(Debug, Clone)]
pub struct GrowableBuffer<T> {
    items: Vec<T>,
    capacity: usize,
    policy: GrowthPolicy,
}

impl<T> GrowableBuffer<T> {
    pub fn new(policy: GrowthPolicy) -> Self {
        GrowableBuffer {
            items: Vec::new(),
            capacity: 0,
            policy,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.items.len() >= self.capacity {
            let new_capacity = self.policy.next_capacity(self.capacity);
            trace!("growing buffer from {} to {} slots", self.capacity, new_capacity);
            self.items.reserve_exact(new_capacity - self.items.len());
            self.capacity = new_capacity;
        }
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Libère la mémoire ; le tampon repart de zéro avec la même politique.
    pub fn free(&mut self) {
        self.items = Vec::new();
        self.capacity = 0;
    }
}

impl<T> Default for GrowableBuffer<T> {
    fn default() -> Self {
        GrowableBuffer::new(GrowthPolicy::default())
    }
}
