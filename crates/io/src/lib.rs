// Input side: bytes in, rows out

pub mod encoding;
pub mod error;
pub mod inventory;
pub mod rows;
pub mod table;

pub use encoding::{
    detect_best_encoding, detect_with_report, score_plausibility, CandidateEncoding,
    DecodePolicy, DecodedText, Detection, EncodingReport,
};
pub use error::IoError;
pub use inventory::{check_inputs, find_order_report, is_order_report_name, InputInventory};
pub use rows::{is_blank, split_line, split_rows, Row, RowSplit};
pub use table::{read_rows, LoadedTable};
