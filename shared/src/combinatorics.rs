/// All ways of choosing `k` of `n` indexes, each in ascending order, listed in
/// lexicographic order. Empty when `n` or `k` is zero or `k > n`.
pub fn n_choose_k(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut rv = Vec::new();
    if n == 0 || k == 0 || k > n {
        return rv;
    }
    let mut scratch = vec![0; k];
    choose_helper(n, k, k, 0, &mut scratch, &mut rv);
    rv
}

fn choose_helper(
    n: usize,
    k: usize,
    remaining: usize,
    start: usize,
    scratch: &mut Vec<usize>,
    rv: &mut Vec<Vec<usize>>,
) {
    if remaining == 0 {
        rv.push(scratch.clone());
        return;
    }
    for i in start..=(n - remaining) {
        scratch[k - remaining] = i;
        choose_helper(n, k, remaining - 1, i + 1, scratch, rv);
    }
}

/// Every permutation of `0..n`, generated with Heap's algorithm.
pub fn permute(n: usize) -> Vec<Vec<usize>> {
    let mut rv = Vec::new();
    if n == 0 {
        return rv;
    }
    let mut scratch: Vec<usize> = (0..n).collect();
    heap_helper(n, &mut scratch, &mut rv);
    rv
}

fn heap_helper(size: usize, scratch: &mut Vec<usize>, rv: &mut Vec<Vec<usize>>) {
    if size == 1 {
        rv.push(scratch.clone());
        return;
    }
    for i in 0..size {
        heap_helper(size - 1, scratch, rv);
        if size % 2 == 1 {
            scratch.swap(0, size - 1);
        } else {
            scratch.swap(i, size - 1);
        }
    }
}
