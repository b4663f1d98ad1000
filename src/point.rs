/// A point in n-dimensional space, tagged with an identifier.
///
/// The identifier is carried along for the caller; it never takes part in
/// distance computations or ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Point<F, I = usize> {
    coords: Vec<F>,
    id: I,
}

impl<F, I> Point<F, I> {
    pub fn new(coords: Vec<F>, id: I) -> Self {
        Point { coords, id }
    }

    pub fn coords(&self) -> &[F] {
        &self.coords
    }

    pub fn id(&self) -> &I {
        &self.id
    }

    /// Number of coordinates.
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    pub fn into_parts(self) -> (Vec<F>, I) {
        (self.coords, self.id)
    }
}

impl<F, I> AsRef<[F]> for Point<F, I> {
    fn as_ref(&self) -> &[F] {
        &self.coords
    }
}
