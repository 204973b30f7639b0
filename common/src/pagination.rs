//! Abstractions for pagination.

/// Maximum number of items a single [`Page`] may contain.
pub const MAX_PER_PAGE: usize = 500;

/// Pagination arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments {
    /// 1-based number of the requested page.
    page: usize,

    /// Number of items per page.
    per_page: usize,
}

impl Arguments {
    /// Creates new [`Arguments`], falling back to the first page and
    /// `default` items per page when those are not provided.
    ///
    /// [`None`] is returned if `page` is `0`, or `per_page` is `0` or
    /// exceeds [`MAX_PER_PAGE`].
    #[must_use]
    pub fn new(
        page: Option<usize>,
        per_page: Option<usize>,
        default: usize,
    ) -> Option<Self> {
        let page = page.unwrap_or(1);
        let per_page = per_page.unwrap_or(default);
        (page > 0 && (1..=MAX_PER_PAGE).contains(&per_page))
            .then_some(Self { page, per_page })
    }

    /// Returns the 1-based number of the requested page.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Returns the number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    /// Returns the number of items to skip before the requested page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

/// A page of items.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<T> {
    /// Items on this [`Page`].
    pub items: Vec<T>,

    /// [`Arguments`] this [`Page`] was built with.
    pub arguments: Arguments,

    /// Total number of items across all pages.
    pub total: usize,
}

impl<T> Page<T> {
    /// Cuts the [`Page`] requested by the provided [`Arguments`] out of the
    /// provided `items`.
    #[must_use]
    pub fn paginate(
        items: impl IntoIterator<Item = T>,
        arguments: Arguments,
    ) -> Self {
        let all = items.into_iter().collect::<Vec<_>>();
        let total = all.len();
        let items = all
            .into_iter()
            .skip(arguments.offset())
            .take(arguments.per_page())
            .collect();
        Self {
            items,
            arguments,
            total,
        }
    }

    /// Returns the total number of pages.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.arguments.per_page())
    }

    /// Indicates whether there is a page after this one.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.arguments.page() < self.total_pages()
    }

    /// Indicates whether there is a page before this one.
    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.arguments.page() > 1
    }

    /// Maps the items of this [`Page`].
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            arguments: self.arguments,
            total: self.total,
        }
    }
}
