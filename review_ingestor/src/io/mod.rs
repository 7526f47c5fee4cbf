pub mod csv;
pub mod dataframe;
pub mod sink;
