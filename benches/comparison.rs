//! Benchmarks comparing FragmentedVec with std::Vec using divan.
//!
//! Run with: `cargo bench`

use fragmented_vec::FragmentedVec;

fn main() {
    divan::main();
}

// Trait to abstract over Vec and FragmentedVec for generic benchmarks
trait VecLike<T>: Default {
    fn with_capacity(cap: usize) -> Self;
    fn push(&mut self, val: T);
    fn get(&self, idx: usize) -> Option<&T>;
    fn len(&self) -> usize;
    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a;
    fn sort(&mut self)
    where
        T: Ord;
    fn binary_search(&self, val: &T) -> Result<usize, usize>
    where
        T: Ord;
    fn insert(&mut self, idx: usize, val: T);
    fn remove(&mut self, idx: usize) -> T;
    fn remove_range(&mut self, idx: usize, count: usize);
}

impl<T> VecLike<T> for Vec<T> {
    fn with_capacity(cap: usize) -> Self {
        Vec::with_capacity(cap)
    }
    fn push(&mut self, val: T) {
        self.push(val);
    }
    fn get(&self, idx: usize) -> Option<&T> {
        <[T]>::get(self, idx)
    }
    fn len(&self) -> usize {
        self.len()
    }
    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        <[T]>::iter(self)
    }
    fn sort(&mut self)
    where
        T: Ord,
    {
        <[T]>::sort(self);
    }
    fn binary_search(&self, val: &T) -> Result<usize, usize>
    where
        T: Ord,
    {
        <[T]>::binary_search(self, val)
    }
    fn insert(&mut self, idx: usize, val: T) {
        self.insert(idx, val);
    }
    fn remove(&mut self, idx: usize) -> T {
        self.remove(idx)
    }
    fn remove_range(&mut self, idx: usize, count: usize) {
        self.drain(idx..idx + count);
    }
}

impl<T> VecLike<T> for FragmentedVec<T> {
    fn with_capacity(cap: usize) -> Self {
        FragmentedVec::with_capacity(cap)
    }
    fn push(&mut self, val: T) {
        self.push(val);
    }
    fn get(&self, idx: usize) -> Option<&T> {
        self.get(idx)
    }
    fn len(&self) -> usize {
        self.len()
    }
    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        FragmentedVec::iter(self)
    }
    fn sort(&mut self)
    where
        T: Ord,
    {
        FragmentedVec::sort(self);
    }
    fn binary_search(&self, val: &T) -> Result<usize, usize>
    where
        T: Ord,
    {
        FragmentedVec::binary_search(self, val)
    }
    fn insert(&mut self, idx: usize, val: T) {
        FragmentedVec::insert(self, idx, val).unwrap();
    }
    fn remove(&mut self, idx: usize) -> T {
        FragmentedVec::remove(self, idx).unwrap()
    }
    fn remove_range(&mut self, idx: usize, count: usize) {
        FragmentedVec::remove_range(self, idx, count).unwrap();
    }
}

fn filled<V: VecLike<i32>>(n: usize) -> V {
    let mut v = V::default();
    for i in 0..n as i32 {
        v.push(i);
    }
    v
}

// ============================================================================
// Push Benchmarks
// ============================================================================

#[divan::bench(types = [Vec<i32>, FragmentedVec<i32>], consts = [100, 1000, 10000])]
fn push<V: VecLike<i32>, const N: usize>() -> V {
    filled(N)
}

#[divan::bench(types = [Vec<i32>, FragmentedVec<i32>], consts = [100, 1000, 10000])]
fn push_with_capacity<V: VecLike<i32>, const N: usize>() -> V {
    let mut v = V::with_capacity(N);
    for i in 0..N as i32 {
        v.push(i);
    }
    v
}

// ============================================================================
// Middle Insert / Remove Benchmarks
// ============================================================================

#[divan::bench(types = [Vec<i32>, FragmentedVec<i32>], consts = [100, 1000, 10000])]
fn insert_middle<V: VecLike<i32>, const N: usize>(bencher: divan::Bencher) {
    bencher
        .with_inputs(|| filled::<V>(N))
        .bench_local_values(|mut v| {
            for i in 0..100 {
                let mid = v.len() / 2;
                v.insert(mid, i);
            }
            v
        });
}

#[divan::bench(types = [Vec<i32>, FragmentedVec<i32>], consts = [100, 1000, 10000])]
fn remove_middle<V: VecLike<i32>, const N: usize>(bencher: divan::Bencher) {
    bencher
        .with_inputs(|| filled::<V>(N))
        .bench_local_values(|mut v| {
            while v.len() > N / 2 {
                let mid = v.len() / 2;
                v.remove(mid);
            }
            v
        });
}

#[divan::bench(types = [Vec<i32>, FragmentedVec<i32>], consts = [1000, 10000])]
fn remove_range_middle<V: VecLike<i32>, const N: usize>(bencher: divan::Bencher) {
    bencher
        .with_inputs(|| filled::<V>(N))
        .bench_local_values(|mut v| {
            v.remove_range(N / 4, N / 2);
            v
        });
}

// ============================================================================
// Mixed Random Operations
// ============================================================================

#[divan::bench(types = [Vec<i32>, FragmentedVec<i32>], consts = [1000, 10000])]
fn random_ops<V: VecLike<i32>, const N: usize>(bencher: divan::Bencher) {
    use rand::prelude::*;
    let mut rng = rand::rng();
    // (kind, position in per-mille of the current length)
    let ops: Vec<(u8, usize)> = (0..1000)
        .map(|_| (rng.random_range(0..4), rng.random_range(0..1000)))
        .collect();

    bencher
        .with_inputs(|| filled::<V>(N))
        .bench_local_values(|mut v| {
            let mut sum = 0i32;
            for &(kind, at) in &ops {
                let idx = v.len() * at / 1000;
                match kind {
                    0 => v.insert(idx, at as i32),
                    1 if v.len() > 0 => {
                        sum = sum.wrapping_add(v.remove(idx));
                    }
                    2 => v.push(at as i32),
                    _ => {
                        if let Some(x) = v.get(idx) {
                            sum = sum.wrapping_add(*x);
                        }
                    }
                }
            }
            (v, sum)
        });
}

// ============================================================================
// Iteration Benchmarks
// ============================================================================

#[divan::bench(types = [Vec<i32>, FragmentedVec<i32>], consts = [100, 1000, 10000])]
fn iterate<V: VecLike<i32>, const N: usize>(bencher: divan::Bencher) {
    bencher
        .with_inputs(|| filled::<V>(N))
        .bench_local_refs(|v| {
            let mut sum = 0i32;
            for &x in v.iter() {
                sum = sum.wrapping_add(x);
            }
            sum
        });
}

#[divan::bench(types = [Vec<i32>, FragmentedVec<i32>], consts = [100, 1000, 10000])]
fn random_read<V: VecLike<i32>, const N: usize>(bencher: divan::Bencher) {
    use rand::prelude::*;
    let mut rng = rand::rng();
    let indices: Vec<usize> = (0..N).map(|_| rng.random_range(0..N)).collect();

    bencher
        .with_inputs(|| filled::<V>(N))
        .bench_local_refs(|v| {
            let mut sum = 0i32;
            for &i in &indices {
                sum = sum.wrapping_add(*v.get(i).unwrap());
            }
            sum
        });
}

// ============================================================================
// Sort + Search Benchmarks
// ============================================================================

#[divan::bench(types = [Vec<i32>, FragmentedVec<i32>], consts = [100, 1000, 10000])]
fn sort_then_search<V: VecLike<i32>, const N: usize>(bencher: divan::Bencher) {
    use rand::prelude::*;
    let mut rng = rand::rng();
    let data: Vec<i32> = (0..N).map(|_| rng.random()).collect();
    let targets: Vec<i32> = (0..100).map(|_| data[rng.random_range(0..N)]).collect();

    bencher
        .with_inputs(|| {
            let mut v = V::default();
            for &x in &data {
                v.push(x);
            }
            v
        })
        .bench_local_values(|mut v| {
            v.sort();
            let mut found = 0usize;
            for t in &targets {
                if v.binary_search(t).is_ok() {
                    found += 1;
                }
            }
            (v, found)
        });
}
