pub mod seed;
pub mod seeder;
pub mod startup;
