use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::ItemKind;
use crate::validation::validate_static_rating;

/// A value bound to a `$n` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i32),
    Float(f64),
}

/// SQL query builder for catalogue searches
///
/// Every filter value becomes a bound parameter; only column and table names
/// derived from `ItemKind` are written into the query text.
pub struct CatalogQueryBuilder {
    kind: ItemKind,
    where_clauses: Vec<String>,
    params: Vec<SqlParam>,
    order_clause: Option<String>,
}

impl CatalogQueryBuilder {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_clause: None,
        }
    }

    fn push(&mut self, clause: impl FnOnce(usize) -> String, param: SqlParam) {
        self.params.push(param);
        let index = self.params.len();
        self.where_clauses.push(clause(index));
    }

    /// Case-insensitive substring match on the title
    pub fn add_search_filter(&mut self, search: &str) {
        self.push(
            |n| format!("i.title ILIKE ${}", n),
            SqlParam::Text(format!("%{}%", escape_like(search))),
        );
    }

    /// Exact match against one element of the genre array
    pub fn add_genre_filter(&mut self, genre: &str) {
        self.push(|n| format!("${} = ANY(i.genre)", n), SqlParam::Text(genre.to_string()));
    }

    /// Case-insensitive substring match on the publisher (books only)
    pub fn add_publisher_filter(&mut self, publisher: &str) {
        self.push(
            |n| format!("i.publisher ILIKE ${}", n),
            SqlParam::Text(format!("%{}%", escape_like(publisher))),
        );
    }

    pub fn add_release_year_filter(&mut self, year: i32) {
        self.push(|n| format!("i.release_year = ${}", n), SqlParam::Int(year));
    }

    /// Static rating greater than or equal to `min`
    pub fn add_min_rating_filter(&mut self, min: f64) {
        self.push(|n| format!("i.rating >= ${}", n), SqlParam::Float(min));
    }

    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        let field_name = match field {
            SortField::ReleaseYear => "i.release_year",
            SortField::Rating => "i.rating",
        };

        let order_str = match order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        self.order_clause = Some(format!("{} {} NULLS LAST, i.id", field_name, order_str));
    }

    /// Builds the final SQL query string with all parameters
    pub fn build(&self) -> (String, Vec<SqlParam>) {
        let mut query = rated_select(self.kind);

        if !self.where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.where_clauses.join(" AND "));
        }

        query.push_str(" GROUP BY i.id ORDER BY ");
        query.push_str(self.order_clause.as_deref().unwrap_or("i.id"));

        (query, self.params.clone())
    }
}

/// Items of a kind joined with the mean and count of their reviews
///
/// Callers append `WHERE`, `GROUP BY i.id` and ordering.
pub fn rated_select(kind: ItemKind) -> String {
    format!(
        "SELECT i.*, AVG(r.rating)::float8 AS review_average, COUNT(r.id) AS review_count \
         FROM {items} i LEFT JOIN {reviews} r ON r.{column} = i.id",
        items = kind.item_table(),
        reviews = kind.review_table(),
        column = kind.item_column(),
    )
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Query parameters of the catalogue search endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Case-insensitive title substring
    pub search: Option<String>,
    /// Exact genre
    pub genre: Option<String>,
    /// Case-insensitive publisher substring (books only)
    pub publisher: Option<String>,
    #[serde(alias = "releaseYear")]
    pub release_year: Option<i32>,
    /// Minimum static rating (inclusive)
    #[serde(alias = "minRating")]
    pub min_rating: Option<f64>,
    /// Sort field: "release_year" or "rating"
    pub sort: Option<String>,
    /// Sort order: "asc" or "desc"
    pub order: Option<String>,
}

/// Sort field options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    ReleaseYear,
    Rating,
}

/// Sort order options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Validated and normalized search parameters
#[derive(Debug, Default, PartialEq)]
pub struct ValidatedSearch {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub release_year: Option<i32>,
    pub min_rating: Option<f64>,
    pub sort_field: Option<SortField>,
    pub sort_order: SortOrder,
}

impl ValidatedSearch {
    /// Checks and normalizes raw parameters for the given kind
    pub fn parse(kind: ItemKind, params: SearchParams) -> Result<Self, String> {
        let publisher = normalize_string(params.publisher);
        if publisher.is_some() && kind != ItemKind::Book {
            return Err("publisher filter applies to books only".to_string());
        }

        if let Some(min) = params.min_rating {
            validate_static_rating(min)
                .map_err(|_| "min_rating must be between 0 and 10".to_string())?;
        }

        let sort_field = params
            .sort
            .as_deref()
            .map(parse_sort_field)
            .transpose()?;

        let sort_order = params
            .order
            .as_deref()
            .map(parse_sort_order)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            search: normalize_string(params.search),
            genre: normalize_string(params.genre),
            publisher,
            release_year: params.release_year,
            min_rating: params.min_rating,
            sort_field,
            sort_order,
        })
    }

    pub fn into_builder(self, kind: ItemKind) -> CatalogQueryBuilder {
        let mut builder = CatalogQueryBuilder::new(kind);
        if let Some(search) = &self.search {
            builder.add_search_filter(search);
        }
        if let Some(genre) = &self.genre {
            builder.add_genre_filter(genre);
        }
        if let Some(publisher) = &self.publisher {
            builder.add_publisher_filter(publisher);
        }
        if let Some(year) = self.release_year {
            builder.add_release_year_filter(year);
        }
        if let Some(min) = self.min_rating {
            builder.add_min_rating_filter(min);
        }
        if let Some(field) = self.sort_field {
            builder.set_sort(field, self.sort_order);
        }
        builder
    }
}

/// Trims whitespace, mapping blank strings to None
fn normalize_string(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_sort_field(s: &str) -> Result<SortField, String> {
    match s.to_lowercase().as_str() {
        "release_year" | "releaseyear" | "year" => Ok(SortField::ReleaseYear),
        "rating" => Ok(SortField::Rating),
        _ => Err(format!(
            "Invalid sort field '{}'. Must be 'release_year' or 'rating'",
            s
        )),
    }
}

fn parse_sort_order(s: &str) -> Result<SortOrder, String> {
    match s.to_lowercase().as_str() {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        _ => Err(format!("Invalid sort order '{}'. Must be 'asc' or 'desc'", s)),
    }
}
