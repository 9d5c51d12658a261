pub mod category;
pub mod problem;
pub mod result;

pub use category::{Category, ParseCategoryError};
pub use problem::{Answer, AnswerShape, ParseAnswerShapeError, Problem};
pub use result::GameResult;
