use validator::ValidationError;

pub trait Parseable<T, E = ValidationError> {
    fn parse(input: T) -> Result<Self, E>
    where
        Self: Sized;
}
