pub const EXAMPLE_QUERIES: [&str; 7] = [
    "Find all movies with Russell Crowe",
    "Show me action movies from 2020",
    "Who directed Gladiator?",
    "List movies with Tom Hanks",
    "Find movies with both Russell Crowe and Tom Hanks",
    "Show me the top 10 movies by year",
    "Find all directors of action movies",
];

#[must_use]
pub fn example_query(index: usize) -> Option<&'static str> {
    EXAMPLE_QUERIES.get(index).copied()
}
