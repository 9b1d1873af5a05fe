/// A course in the sidebar and the starter code the editor opens with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Course {
    pub name: &'static str,
    pub sample: &'static str,
}

pub const DEFAULT_COURSE: &str = "React Hooks";

const COURSES: &[Course] = &[
    Course {
        name: "React Hooks",
        sample: r#"import { useState, useEffect } from 'react';

function Timer() {
  const [count, setCount] = useState(0);

  useEffect(() => {
    const timerId = setTimeout(() => {
      setCount(c => c + 1);
    }, 1000);
    return () => clearTimeout(timerId);
  }, []); // Note: empty dependency array means this runs only on mount

  return <h1>I've rendered {count} times!</h1>;
}"#,
    },
    Course {
        name: "Advanced TypeScript",
        sample: r#"interface User {
  id: number;
  name: string;
  email?: string;
}

type PartialUser = Partial<User>; // Makes all properties optional
type ReadonlyUser = Readonly<User>; // Makes all properties readonly

function updateUser(id: number, update: PartialUser) {
  // ... implementation
  console.log(`Updating user ${id} with`, update);
}

updateUser(1, { name: 'New Name' });"#,
    },
    Course {
        name: "CSS Grid Mastery",
        sample: r#"
.container {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
  gap: 20px;
}

.item {
  background-color: #3498db;
  padding: 20px;
  border-radius: 5px;
  color: white;
}"#,
    },
    Course {
        name: "Node.js Performance",
        sample: r#"const { performance } = require('perf_hooks');

function someSlowFunction() {
  let sum = 0;
  for (let i = 0; i < 1000000000; i++) {
    sum += i;
  }
  return sum;
}

const t0 = performance.now();
someSlowFunction();
const t1 = performance.now();

console.log(`someSlowFunction took ${(t1 - t0).toFixed(2)} milliseconds.`);"#,
    },
];

pub fn all() -> &'static [Course] {
    COURSES
}

pub fn find(name: &str) -> Option<&'static Course> {
    COURSES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

pub fn position(name: &str) -> Option<usize> {
    COURSES.iter().position(|c| c.name.eq_ignore_ascii_case(name))
}

/// Starter code for a course, or an empty buffer for an unknown name
pub fn sample_for(name: &str) -> &'static str {
    find(name).map(|c| c.sample).unwrap_or("")
}
