//! Write a small MAT-file with one array of each major kind

use mat5::{
    CellArray, CharArray, DoubleArray, MatArray, MatFileWriter, SparseArray, StructArray,
};
use std::time::Instant;

fn main() -> mat5::Result<()> {
    // 3x2 double matrix, packed by columns
    let doubles = DoubleArray::from_slice("double_arr", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3)?;

    let chars = CharArray::from_str("char_arr", "I am dummy");

    let mut st = StructArray::new("settings", vec![1, 1]);
    st.set("gain", DoubleArray::from_slice("", &[0.5], 1)?.into());
    st.set("label", CharArray::from_str("", "run-42").into());

    let cell = CellArray::from_vec(
        "cell_arr",
        vec![2, 1],
        vec![
            CharArray::from_str("", "Hello").into(),
            CharArray::from_str("", "World").into(),
        ],
    )?;

    let mut sparse = SparseArray::new("sparse_arr", vec![3, 3], 3);
    sparse.set_real(0, 0, 1.5);
    sparse.set_real(1, 1, 2.5);
    sparse.set_real(2, 2, 3.5);

    let arrays: Vec<MatArray> = vec![
        doubles.into(),
        chars.into(),
        st.into(),
        cell.into(),
        sparse.into(),
    ];

    let start = Instant::now();
    MatFileWriter::new().write_path("example_file.mat", &arrays)?;
    println!("Wrote {} arrays in {:?}", arrays.len(), start.elapsed());

    for array in &arrays {
        println!("   {} {array}", array.name());
    }
    println!("\nRun 'cargo run --example read_matfile' to read it back!");
    Ok(())
}
